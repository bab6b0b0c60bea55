//! Per-hub rules deciding who receives newly created leads.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::types::{EmployeeId, HubId, string_enum};

string_enum!(
    /// Strategy used to pick an assignee for an unassigned lead.
    AssignmentMode {
        Manual,
        RoundRobin,
        LeastLoaded,
    }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AssignmentSettings {
    pub hub_id: HubId,
    pub mode: AssignmentMode,
    pub pool: Vec<EmployeeId>,
    pub last_assigned: Option<EmployeeId>,
}

impl AssignmentSettings {
    /// Settings used for hubs that never configured assignment.
    #[must_use]
    pub fn manual(hub_id: HubId) -> Self {
        Self {
            hub_id,
            mode: AssignmentMode::Manual,
            pool: Vec::new(),
            last_assigned: None,
        }
    }

    /// Picks the next assignee among pool members that are still `active`.
    ///
    /// `open_leads` holds the number of open leads per employee and is only
    /// consulted in [`AssignmentMode::LeastLoaded`].
    pub fn pick_assignee(
        &self,
        active: &[EmployeeId],
        open_leads: &HashMap<EmployeeId, usize>,
    ) -> Option<EmployeeId> {
        let candidates: BTreeSet<EmployeeId> = self
            .pool
            .iter()
            .copied()
            .filter(|id| active.contains(id))
            .collect();

        if candidates.is_empty() {
            return None;
        }

        match self.mode {
            AssignmentMode::Manual => None,
            AssignmentMode::RoundRobin => {
                let next = match self.last_assigned {
                    Some(last) => candidates.range((
                        std::ops::Bound::Excluded(last),
                        std::ops::Bound::Unbounded,
                    ))
                    .next()
                    .copied(),
                    None => None,
                };
                next.or_else(|| candidates.iter().next().copied())
            }
            AssignmentMode::LeastLoaded => candidates
                .iter()
                .copied()
                .min_by_key(|id| (open_leads.get(id).copied().unwrap_or(0), *id)),
        }
    }
}
