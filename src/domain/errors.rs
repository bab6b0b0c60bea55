//! Business-rule violations raised by domain aggregates.

use thiserror::Error;

use crate::domain::types::Money;

/// A requested change breaks a rule owned by the domain (state machines,
/// balances, ranges). Validation-flavoured variants are reported back to the
/// caller as form errors, the rest as conflicts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("cannot move {entity} from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("{0} can only be changed while in draft")]
    NotEditable(&'static str),

    #[error("invoice in status {0} does not accept payments")]
    NotPayable(String),

    #[error("payment amount must be greater than zero")]
    NonPositivePayment,

    #[error("payment exceeds the balance due of {balance}")]
    Overpayment { balance: Money },

    #[error("invoice has recorded payments")]
    HasPayments,

    #[error("quotation has already been converted to an invoice")]
    AlreadyConverted,

    #[error("quotation is past its validity date")]
    Expired,

    #[error("expense cannot be reviewed by its owner")]
    SelfReview,

    #[error("already checked in for the day")]
    AlreadyCheckedIn,

    #[error("no check-in recorded for the day")]
    NotCheckedIn,

    #[error("already checked out for the day")]
    AlreadyCheckedOut,

    #[error("check-out time precedes check-in time")]
    CheckOutBeforeCheckIn,

    #[error("end date precedes start date")]
    InvalidDateRange,

    #[error("leave request must stay within one calendar year")]
    SpansYears,

    #[error("requested range contains no working days")]
    NoWorkingDays,

    #[error("leave overlaps an existing request")]
    OverlappingLeave,

    #[error("insufficient leave balance: requested {requested}, remaining {remaining}")]
    InsufficientLeave { requested: i32, remaining: i32 },

    #[error("leave has already started")]
    LeaveAlreadyStarted,

    #[error("job opening is not accepting candidates")]
    JobNotOpen,

    #[error("conversation needs at least two participants")]
    NotEnoughParticipants,
}

impl DomainError {
    /// Whether the violation stems from malformed input rather than from the
    /// current state of the stored aggregate.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::NonPositivePayment
                | DomainError::InvalidDateRange
                | DomainError::SpansYears
                | DomainError::NoWorkingDays
                | DomainError::NotEnoughParticipants
        )
    }
}
