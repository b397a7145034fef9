//! Axum integration for row-level permission checks
//!
//! Routes register a [`middleware::RouteGuard`] as a route layer; the guard
//! reads the authenticated caller from request extensions and the object id
//! from a path parameter, and answers 403 before the handler runs when the
//! check fails.

pub mod error;
pub mod middleware;

pub use error::{HttpError, Result};
pub use middleware::{AuthenticatedUser, RouteGuard, permission_middleware};
