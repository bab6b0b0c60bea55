//! Per-hub assignment settings and the assigner used when leads arrive
//! without an owner.

use std::collections::HashMap;

use crate::SERVICE_ADMIN_ROLE;
use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::lead_assignment::{AssignmentMode, AssignmentSettings};
use crate::domain::types::{EmployeeId, HubId};
use crate::forms::FormError;
use crate::forms::lead_assignment::AssignmentSettingsForm;
use crate::repository::{AssignmentReader, AssignmentWriter, EmployeeReader, LeadReader};
use crate::services::ServiceResult;

pub fn get_settings<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<AssignmentSettings>
where
    R: AssignmentReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    Ok(repo.get_assignment_settings(hub_id)?)
}

/// Replaces mode and pool. Every pool member must be an active employee of
/// the hub.
pub fn save_settings<R>(
    form: AssignmentSettingsForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<AssignmentSettings>
where
    R: AssignmentReader + AssignmentWriter + EmployeeReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let mut settings = form.into_domain(hub_id)?;

    let active = repo.filter_active_employees(hub_id, &settings.pool)?;
    if let Some(missing) = settings.pool.iter().find(|id| !active.contains(id)) {
        return Err(FormError::InvalidField {
            field: "pool",
            source: crate::domain::types::TypeConstraintError::InvalidValue(format!(
                "employee {missing} is not an active employee of the hub"
            )),
        }
        .into());
    }

    settings.last_assigned = repo.get_assignment_settings(hub_id)?.last_assigned;

    let saved = repo.save_assignment_settings(&settings).map_err(|err| {
        log::error!("Failed to save assignment settings of hub {hub_id}: {err}");
        err
    })?;
    log::info!(
        "Hub {hub_id} assigns leads in {} mode across {} employees",
        saved.mode,
        saved.pool.len()
    );
    Ok(saved)
}

/// Hands out assignees for a batch of new leads, advancing the round-robin
/// cursor and load counts as it goes.
pub(crate) struct Assigner {
    settings: AssignmentSettings,
    active: Vec<EmployeeId>,
    open_leads: HashMap<EmployeeId, usize>,
    advanced: bool,
}

impl Assigner {
    pub(crate) fn load<R>(hub_id: HubId, repo: &R) -> ServiceResult<Self>
    where
        R: AssignmentReader + EmployeeReader + LeadReader + ?Sized,
    {
        let settings = repo.get_assignment_settings(hub_id)?;

        let (active, open_leads) =
            if settings.mode == AssignmentMode::Manual || settings.pool.is_empty() {
                (Vec::new(), HashMap::new())
            } else {
                let active = repo.filter_active_employees(hub_id, &settings.pool)?;
                let open_leads = if settings.mode == AssignmentMode::LeastLoaded {
                    repo.count_open_leads(hub_id, &active)?
                } else {
                    HashMap::new()
                };
                (active, open_leads)
            };

        Ok(Self {
            settings,
            active,
            open_leads,
            advanced: false,
        })
    }

    pub(crate) fn next(&mut self) -> Option<EmployeeId> {
        let picked = self.settings.pick_assignee(&self.active, &self.open_leads)?;
        self.settings.last_assigned = Some(picked);
        *self.open_leads.entry(picked).or_insert(0) += 1;
        self.advanced = true;
        Some(picked)
    }

    /// Persists the round-robin cursor once the batch is stored.
    pub(crate) fn finish<R>(self, repo: &R) -> ServiceResult<()>
    where
        R: AssignmentWriter + ?Sized,
    {
        if !self.advanced || self.settings.mode != AssignmentMode::RoundRobin {
            return Ok(());
        }
        if let Some(last) = self.settings.last_assigned {
            repo.record_last_assigned(self.settings.hub_id, last)?;
        }
        Ok(())
    }
}
