//! Database models shared across the CRM repository.

pub mod attendance;
pub mod billing;
pub mod campaign;
pub mod employee;
pub mod expense;
pub mod lead;
pub mod messenger;
pub mod policy;
pub mod recruitment;

#[cfg(feature = "server")]
pub mod config;
