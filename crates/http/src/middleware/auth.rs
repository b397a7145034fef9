use crate::error::HttpError;
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{Extensions, request::Parts},
    middleware::Next,
    response::Response,
};
use rowguard_core::access::{StaticCaller, UserId};
use std::sync::Arc;

/// Header set by a trusted upstream gateway carrying the caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity placed in request extensions by [`auth_middleware`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
}

impl AuthenticatedUser {
    /// The caller resolver for a request; empty when nobody authenticated
    pub fn caller(extensions: &Extensions) -> StaticCaller {
        StaticCaller(extensions.get::<Self>().map(|user| user.id))
    }
}

/// Trait for authentication providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Authenticate a request and return the caller if successful
    async fn authenticate(&self, parts: &Parts) -> Result<AuthenticatedUser, HttpError>;
}

/// Trusts the user id forwarded in [`USER_ID_HEADER`]
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderAuthProvider;

#[async_trait]
impl AuthProvider for HeaderAuthProvider {
    async fn authenticate(&self, parts: &Parts) -> Result<AuthenticatedUser, HttpError> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                HttpError::AuthenticationFailed(format!("Missing {USER_ID_HEADER} header"))
            })?;

        let id = value.trim().parse::<UserId>().map_err(|_| {
            HttpError::AuthenticationFailed(format!("Invalid {USER_ID_HEADER} header"))
        })?;

        Ok(AuthenticatedUser { id })
    }
}

/// Middleware function for authentication
pub async fn auth_middleware(
    State(provider): State<Arc<dyn AuthProvider>>,
    req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let (mut parts, body) = req.into_parts();

    let user = provider.authenticate(&parts).await?;
    tracing::debug!(user_id = user.id, "Request authenticated");
    parts.extensions.insert(user);

    Ok(next.run(Request::from_parts(parts, body)).await)
}
