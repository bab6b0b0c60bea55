//! Domain aggregates exposed by the CRM service layer.

pub mod attendance;
pub mod billing;
pub mod campaign;
pub mod employee;
pub mod errors;
pub mod expense;
pub mod invoice;
pub mod lead;
pub mod lead_activity;
pub mod lead_assignment;
pub mod leave;
pub mod messenger;
pub mod policy;
pub mod quotation;
pub mod recruitment;
pub mod types;
