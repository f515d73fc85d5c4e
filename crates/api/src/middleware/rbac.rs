//! Role gate middleware for actor surfaces.
//!
//! Route groups are gated by the role carried in the actor context; the
//! fine-grained policy (tab visibility, transition rights) lives in the
//! domain access service.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::middleware::user_auth::ActorContext;
use domain::models::role::AppRole;

/// Middleware that requires an admin or super admin actor.
///
/// Requires `ActorContext` in request extensions (use after `require_auth`).
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    require_role_impl(req, next, |role| role.is_admin()).await
}

/// Middleware that requires a staff actor.
///
/// Requires `ActorContext` in request extensions (use after `require_auth`).
pub async fn require_staff(req: Request<Body>, next: Next) -> Response {
    require_role_impl(req, next, |role| role == AppRole::Staff).await
}

async fn require_role_impl(
    req: Request<Body>,
    next: Next,
    allowed: fn(AppRole) -> bool,
) -> Response {
    let actor = match req.extensions().get::<ActorContext>() {
        Some(actor) => actor.clone(),
        None => {
            tracing::warn!("Role gate called without ActorContext in extensions");
            return unauthorized_response("Authentication required");
        }
    };

    if !allowed(actor.role) {
        return forbidden_response(&format!(
            "Role {} may not access this resource",
            actor.role
        ));
    }

    next.run(req).await
}

/// Helper to create forbidden response.
fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_response() {
        let response = forbidden_response("Test message");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_unauthorized_response() {
        let response = unauthorized_response("Test message");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_admin_predicate() {
        let allowed: fn(AppRole) -> bool = |role| role.is_admin();
        assert!(allowed(AppRole::SuperAdmin));
        assert!(allowed(AppRole::Admin));
        assert!(!allowed(AppRole::Staff));
        assert!(!allowed(AppRole::Customer));
    }

    #[test]
    fn test_staff_predicate() {
        let allowed: fn(AppRole) -> bool = |role| role == AppRole::Staff;
        assert!(allowed(AppRole::Staff));
        assert!(!allowed(AppRole::Admin));
        assert!(!allowed(AppRole::Customer));
    }
}
