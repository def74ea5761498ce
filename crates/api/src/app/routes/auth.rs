use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

/// Signup and login; no token required.
pub fn public_router() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Endpoints for any authenticated caller.
pub fn session_router() -> Router {
    Router::new()
        .route("/me", get(me))
        .route("/change-password", put(change_password))
}

pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::SignupRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::rejection_to_response(e),
    };

    match services
        .sessions
        .signup(&body.name, &body.email, &body.password)
        .await
    {
        Ok(session) => (StatusCode::CREATED, Json(session)).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::rejection_to_response(e),
    };

    match services.sessions.login(&body.email, &body.password).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.sessions.current_user(principal.token()).await {
        Ok(user) => Json(json!({ "user": user })).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::ChangePasswordRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::rejection_to_response(e),
    };

    match services
        .sessions
        .change_password(principal.token(), &body.current_password, &body.new_password)
        .await
    {
        Ok(()) => Json(json!({ "message": "Password updated successfully" })).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}
