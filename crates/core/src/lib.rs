//! Row-level permission checks for business objects
//!
//! A [`PermissionGuard`](access::PermissionGuard) runs before a guarded
//! operation: it resolves the caller, extracts the target object id from
//! the operation's arguments, loads the grants attached to that object and
//! applies the ownership / public pool / level policy.

pub mod access;
pub mod config;
pub mod errors;
pub mod telemetry;
pub mod validation;


pub use config::{DenialConfig, GuardConfig};
pub use errors::{Error, Result};
pub use validation::ValidateConfig;
