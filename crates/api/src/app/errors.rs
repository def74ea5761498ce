use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use rbac_auth::{AuthError, GateError};

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::InvalidCredentials => {
            json_error(StatusCode::BAD_REQUEST, "invalid_credentials", err.to_string())
        }
        AuthError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        AuthError::WeakPassword(violation) => {
            let msg = violation.to_string();
            (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({
                    "error": "weak_password",
                    "message": msg,
                    "errors": [{ "msg": msg }],
                })),
            )
                .into_response()
        }
        AuthError::InvalidToken(_) => json_error(StatusCode::UNAUTHORIZED, "invalid_token", err.to_string()),
        AuthError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        AuthError::EmailTaken => json_error(StatusCode::CONFLICT, "email_taken", err.to_string()),
        AuthError::Internal(detail) => {
            tracing::error!(error = %detail, "internal error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Server error")
        }
    }
}

pub fn gate_error_to_response(err: GateError) -> axum::response::Response {
    match err {
        GateError::Unauthenticated(_) => json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "Authentication required",
        ),
        GateError::Forbidden { .. } => json_error(StatusCode::FORBIDDEN, "forbidden", "Access denied"),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Malformed or mistyped JSON body.
pub fn rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}
