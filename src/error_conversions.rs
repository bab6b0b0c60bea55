//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service/repository error types, so the
//! conversions out of domain errors live here instead.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::domain::errors::DomainError;
    use crate::domain::types::TypeConstraintError;
    use crate::services::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::TypeConstraint(val.to_string())
        }
    }

    impl From<DomainError> for ServiceError {
        fn from(val: DomainError) -> Self {
            if val.is_validation() {
                ServiceError::Form(val.to_string())
            } else {
                ServiceError::Conflict(val.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_constraint_becomes_validation_error() {
        let err: RepositoryError = TypeConstraintError::InvalidEmail.into();
        assert!(matches!(err, RepositoryError::ValidationError(msg) if msg == "invalid email address"));
    }

    #[cfg(feature = "server")]
    #[test]
    fn domain_errors_split_into_form_and_conflict() {
        use crate::domain::errors::DomainError;
        use crate::services::ServiceError;

        assert!(matches!(
            ServiceError::from(DomainError::InvalidDateRange),
            ServiceError::Form(_)
        ));
        assert!(matches!(
            ServiceError::from(DomainError::HasPayments),
            ServiceError::Conflict(_)
        ));
    }
}
