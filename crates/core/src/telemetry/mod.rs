//! Logging and decision counters for the permission guard

pub mod config;
pub mod metrics;

#[cfg(feature = "subscriber")]
pub mod init;

pub use config::InstrumentationConfig;
pub use metrics::{Counter, counter};
