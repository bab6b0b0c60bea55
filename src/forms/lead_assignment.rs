use serde::Deserialize;

use crate::domain::lead_assignment::{AssignmentMode, AssignmentSettings};
use crate::domain::types::{EmployeeId, HubId};
use crate::forms::{FormError, invalid, parse_variant};

#[derive(Debug, Deserialize)]
/// Body of `PUT /lead-assignment`; replaces mode and pool.
pub struct AssignmentSettingsForm {
    pub mode: String,
    #[serde(default)]
    pub pool: Vec<i32>,
}

impl AssignmentSettingsForm {
    /// Builds settings with a de-duplicated pool. `last_assigned` is carried
    /// over by the caller.
    pub fn into_domain(self, hub_id: HubId) -> Result<AssignmentSettings, FormError> {
        let mode = parse_variant::<AssignmentMode>("mode", &self.mode)?;

        let mut pool = self
            .pool
            .into_iter()
            .map(EmployeeId::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid("pool"))?;
        pool.sort();
        pool.dedup();

        Ok(AssignmentSettings {
            hub_id,
            mode,
            pool,
            last_assigned: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_is_sorted_and_deduplicated() {
        let form = AssignmentSettingsForm {
            mode: "RoundRobin".into(),
            pool: vec![3, 1, 3],
        };
        let settings = form.into_domain(HubId::new(1).unwrap()).unwrap();

        assert_eq!(settings.mode, AssignmentMode::RoundRobin);
        assert_eq!(
            settings.pool,
            vec![EmployeeId::new(1).unwrap(), EmployeeId::new(3).unwrap()]
        );
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let form = AssignmentSettingsForm {
            mode: "Random".into(),
            pool: vec![],
        };
        assert!(matches!(
            form.into_domain(HubId::new(1).unwrap()),
            Err(FormError::UnknownVariant { field: "mode", .. })
        ));
    }
}
