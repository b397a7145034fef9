//! Middleware components for HTTP request processing

pub mod auth;
pub mod permission;

pub use auth::{AuthProvider, AuthenticatedUser, HeaderAuthProvider, USER_ID_HEADER, auth_middleware};
pub use permission::{RouteGuard, permission_middleware};
