use axum::{
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use rbac_auth::{extract_bearer, AuthorizationGate, Role};

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub gate: AuthorizationGate,
    /// `None` admits any authenticated caller.
    pub required: Option<Role>,
}

impl AuthState {
    pub fn authenticated(gate: AuthorizationGate) -> Self {
        Self { gate, required: None }
    }

    pub fn role(gate: AuthorizationGate, role: Role) -> Self {
        Self {
            gate,
            required: Some(role),
        }
    }
}

/// Runs the authorization gate before the wrapped handlers.
///
/// 401 when the bearer token is missing or fails verification, 403 when the
/// token's role does not match `required`.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let identity = match state.gate.authorize(header, state.required) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::info!(path = %req.uri().path(), error = %e, "request rejected by gate");
            return Err(errors::gate_error_to_response(e));
        }
    };

    // `authorize` succeeded, so the header holds a bearer token.
    let token = extract_bearer(header).unwrap_or_default().to_string();
    req.extensions_mut().insert(PrincipalContext::new(identity, token));

    Ok(next.run(req).await)
}
