//! Per-route permission checks

use super::auth::AuthenticatedUser;
use crate::error::HttpError;
use axum::{
    extract::{FromRequestParts, Path, Request, State},
    middleware::Next,
    response::Response,
};
use rowguard_core::access::{BizId, OperationArg, OperationDeclaration, PermissionGuard};
use std::collections::HashMap;
use std::sync::Arc;

/// What a route requires and where its object id lives
#[derive(Clone)]
pub struct RouteGuard {
    guard: Arc<PermissionGuard>,
    declaration: OperationDeclaration,
    id_param: Option<&'static str>,
}

impl RouteGuard {
    /// The id always comes from the path, so any id-bearing argument types
    /// on `declaration` are dropped.
    pub fn new(guard: Arc<PermissionGuard>, mut declaration: OperationDeclaration) -> Self {
        declaration.id_for.clear();
        Self {
            guard,
            declaration,
            id_param: None,
        }
    }

    /// Read the object id from the path parameter `name`
    #[must_use]
    pub fn id_param(mut self, name: &'static str) -> Self {
        self.id_param = Some(name);
        self
    }

    async fn arguments(&self, parts: &mut axum::http::request::Parts) -> Vec<OperationArg> {
        let Some(name) = self.id_param else {
            return Vec::new();
        };

        let Ok(Path(params)) = Path::<HashMap<String, String>>::from_request_parts(parts, &()).await
        else {
            return Vec::new();
        };

        let arg = match params.get(name) {
            Some(raw) => raw
                .parse::<BizId>()
                .map_or_else(|_| OperationArg::Text(raw.clone()), OperationArg::Id),
            None => OperationArg::Null,
        };
        vec![arg]
    }
}

/// Route layer enforcing a [`RouteGuard`].
///
/// Register with `route_layer(from_fn_with_state(route_guard, permission_middleware))`
/// so path parameters are matched before the check runs.
pub async fn permission_middleware(
    State(route): State<RouteGuard>,
    req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let (mut parts, body) = req.into_parts();

    let args = route.arguments(&mut parts).await;
    let caller = AuthenticatedUser::caller(&parts.extensions);
    route
        .guard
        .evaluate(&caller, &args, &route.declaration)
        .await?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, StatusCode};
    use axum::routing::get;
    use axum::{Extension, Router, middleware::from_fn_with_state};
    use rowguard_core::access::{
        BizType, MemoryGrantStore, PERMISSION_DENIED, PermissionEvaluator, PermissionGrant,
        PermissionLevel, UserId,
    };
    use tower::ServiceExt;

    async fn handler() -> &'static str {
        "ok"
    }

    fn app(
        grants: Vec<PermissionGrant>,
        declaration: OperationDeclaration,
        user: Option<UserId>,
    ) -> Router {
        let evaluator = PermissionEvaluator::new(Arc::new(MemoryGrantStore::new(grants)));
        let route = RouteGuard::new(Arc::new(PermissionGuard::new(evaluator)), declaration)
            .id_param("id");

        let router = Router::new()
            .route("/leads/{id}", get(handler).put(handler))
            .route_layer(from_fn_with_state(route, permission_middleware));

        match user {
            Some(id) => router.layer(Extension(AuthenticatedUser { id })),
            None => router,
        }
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), 10_000).await.unwrap();
        let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    fn owned_lead() -> Vec<PermissionGrant> {
        vec![
            PermissionGrant::new(BizType::Leads, 1, 7, PermissionLevel::Owner),
            PermissionGrant::new(BizType::Leads, 1, 9, PermissionLevel::Read),
        ]
    }

    #[tokio::test]
    async fn test_owner_reaches_handler() {
        let app = app(owned_lead(), OperationDeclaration::write(BizType::Leads), Some(7));
        let (status, _) = send(app, Method::PUT, "/leads/1").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unowned_lead_is_readable() {
        let app = app(vec![], OperationDeclaration::read(BizType::Leads), Some(42));
        let (status, _) = send(app, Method::GET, "/leads/1").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_reader_cannot_write() {
        let app = app(owned_lead(), OperationDeclaration::write(BizType::Leads), Some(9));
        let (status, body) = send(app, Method::PUT, "/leads/1").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "permission_denied");
        assert_eq!(body["code"], PERMISSION_DENIED);
        assert_eq!(body["message"], "leads operation failed: no permission");
    }

    #[tokio::test]
    async fn test_declared_argument_types_still_check_path_id() {
        let declaration = OperationDeclaration::read(BizType::Leads).id_for("LeadDetail");
        let app = app(owned_lead(), declaration, Some(11));
        let (status, _) = send(app, Method::GET, "/leads/1").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_anonymous_request_is_denied() {
        let app = app(vec![], OperationDeclaration::read(BizType::Leads), None);
        let (status, body) = send(app, Method::GET, "/leads/1").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], PERMISSION_DENIED);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_denied() {
        let app = app(vec![], OperationDeclaration::read(BizType::Leads), Some(7));
        let (status, _) = send(app, Method::GET, "/leads/abc").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
