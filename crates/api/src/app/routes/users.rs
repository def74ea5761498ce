use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde_json::json;

use rbac_core::UserId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

/// Account administration; mounted behind the admin-role gate.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", put(update_user).delete(delete_user))
}

fn parse_user_id(id: &str) -> Result<UserId, axum::response::Response> {
    id.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"))
}

pub async fn list_users(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.admin.list_users().await {
        Ok(users) => Json(json!({ "users": users })).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::CreateUserRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::rejection_to_response(e),
    };

    match services.admin.create_user(body.into()).await {
        Ok(user) => {
            tracing::info!(admin_id = %principal.user_id(), user_id = %user.id, "user created");
            (StatusCode::CREATED, Json(json!({ "user": user }))).into_response()
        }
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateUserRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_user_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::rejection_to_response(e),
    };

    match services.admin.update_user(id, body.into()).await {
        Ok(user) => {
            tracing::info!(admin_id = %principal.user_id(), user_id = %user.id, role = %user.role, "user updated");
            Json(json!({ "user": user })).into_response()
        }
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_user_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.admin.delete_user(id).await {
        Ok(()) => {
            tracing::info!(admin_id = %principal.user_id(), user_id = %id, "user deleted");
            Json(json!({ "message": "User deleted successfully" })).into_response()
        }
        Err(e) => errors::auth_error_to_response(e),
    }
}
