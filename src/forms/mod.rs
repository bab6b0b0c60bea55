//! Request payloads accepted by the CRM API and their conversion into domain
//! values.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::errors::DomainError;
use crate::domain::types::{TypeConstraintError, trimmed_opt};

pub mod attendance;
pub mod campaigns;
pub mod employees;
pub mod expenses;
pub mod invoices;
pub mod lead_assignment;
pub mod leads;
pub mod leave;
pub mod messenger;
pub mod policies;
pub mod quotations;
pub mod recruitment;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid {field}: {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: TypeConstraintError,
    },

    #[error(transparent)]
    Rule(#[from] DomainError),

    #[error("unknown {field} value `{value}`")]
    UnknownVariant { field: &'static str, value: String },

    #[error("row {row}: {reason}")]
    CsvRow { row: usize, reason: String },

    #[error("unreadable csv file: {0}")]
    CsvFile(String),
}

/// Tags a value-object failure with the name of the offending field.
pub(crate) fn invalid(field: &'static str) -> impl FnOnce(TypeConstraintError) -> FormError {
    move |source| FormError::InvalidField { field, source }
}

/// Parses a `string_enum!` field, reporting unknown values by name.
pub(crate) fn parse_variant<T>(field: &'static str, value: &str) -> Result<T, FormError>
where
    T: std::str::FromStr,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|_| FormError::UnknownVariant {
            field,
            value: value.to_string(),
        })
}

/// Builds an optional value object from an optional string; blank input is
/// treated as absent.
pub(crate) fn optional<T>(
    field: &'static str,
    value: Option<String>,
    build: impl FnOnce(String) -> Result<T, TypeConstraintError>,
) -> Result<Option<T>, FormError> {
    trimmed_opt(value)
        .map(build)
        .transpose()
        .map_err(invalid(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead::LeadStatus;
    use crate::domain::types::EmailAddress;

    #[test]
    fn blank_optionals_are_dropped() {
        let email = optional("email", Some("   ".into()), EmailAddress::new).unwrap();
        assert!(email.is_none());

        let err = optional("email", Some("nope".into()), EmailAddress::new).unwrap_err();
        assert_eq!(err.to_string(), "invalid email: invalid email address");
    }

    #[test]
    fn unknown_variants_name_the_field() {
        let err = parse_variant::<LeadStatus>("status", "Dormant").unwrap_err();
        assert_eq!(err.to_string(), "unknown status value `Dormant`");
        assert_eq!(
            parse_variant::<LeadStatus>("status", " Won ").unwrap(),
            LeadStatus::Won
        );
    }
}
