//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: session manager, admin service and gate sharing one store
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Extension, Router};

use rbac_auth::Role;

use crate::middleware::{self, AuthState};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let session = routes::auth::session_router().route_layer(from_fn_with_state(
        AuthState::authenticated(services.gate.clone()),
        middleware::auth_middleware,
    ));

    let admin = routes::users::router().route_layer(from_fn_with_state(
        AuthState::role(services.gate.clone(), Role::Admin),
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/auth", routes::auth::public_router().merge(session))
        .nest("/users", admin)
        .layer(Extension(services))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use rbac_auth::{Argon2PasswordHasher, InMemoryCredentialStore, TokenConfig};

    use super::*;

    fn app() -> Router {
        let hasher = Argon2PasswordHasher::with_params(1024, 1, 1).unwrap();
        let services = AppServices::new(
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(hasher),
            TokenConfig::default(),
        );
        build_app(Arc::new(services))
    }

    async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(json) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };

        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_is_public() {
        let (status, _) = call(&app(), Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn signup_returns_token_and_user_profile() {
        let app = app();
        let (status, body) = call(
            &app,
            Method::POST,
            "/auth/signup",
            None,
            Some(serde_json::json!({"name": "Alice", "email": "a@x.com", "password": "Abc123"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["user"]["role"], "user");
        assert_eq!(body["user"]["email"], "a@x.com");
        assert!(body["user"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn weak_password_lists_errors() {
        let (status, body) = call(
            &app(),
            Method::POST,
            "/auth/signup",
            None,
            Some(serde_json::json!({"name": "Alice", "email": "a@x.com", "password": "abc123"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Password must contain at least one uppercase letter");
        assert_eq!(body["errors"][0]["msg"], body["message"]);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request_with_message() {
        let (status, body) = call(
            &app(),
            Method::POST,
            "/auth/login",
            None,
            Some(serde_json::json!({"email": "a@x.com"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let app = app();
        for (method, uri) in [
            (Method::GET, "/auth/me"),
            (Method::PUT, "/auth/change-password"),
            (Method::GET, "/users"),
            (Method::DELETE, "/users/0190a6d2-0000-7000-8000-000000000000"),
        ] {
            let (status, body) = call(&app, method, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert!(body["message"].is_string());
        }
    }

    #[tokio::test]
    async fn user_token_is_forbidden_on_admin_routes() {
        let app = app();
        let (_, body) = call(
            &app,
            Method::POST,
            "/auth/signup",
            None,
            Some(serde_json::json!({"name": "Alice", "email": "a@x.com", "password": "Abc123"})),
        )
        .await;
        let token = body["token"].as_str().unwrap().to_string();

        let (status, _) = call(&app, Method::GET, "/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = call(&app, Method::GET, "/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "Alice");
    }
}
