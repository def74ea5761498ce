use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use rbac_core::UserId;

use crate::token::TokenService;
use crate::Role;

/// Identity admitted by the gate, taken from verified token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizedIdentity {
    pub user_id: UserId,
    pub role: Role,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// No token, or one that failed verification. The client should re-login.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Valid token, wrong role. The client should show an access-denied view.
    #[error("forbidden: requires role '{required}', token carries '{actual}'")]
    Forbidden { required: Role, actual: Role },
}

impl GateError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, GateError::Forbidden { .. })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme name is matched case-insensitively.
pub fn extract_bearer(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Per-request check run before any protected operation.
///
/// - No IO: decisions use only the token's claims.
/// - Role matching is exact (`admin` does not satisfy a `user` requirement).
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    tokens: Arc<TokenService>,
}

impl AuthorizationGate {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// `required = None` admits any authenticated caller.
    pub fn authorize(
        &self,
        authorization: Option<&str>,
        required: Option<Role>,
    ) -> Result<AuthorizedIdentity, GateError> {
        self.authorize_at(authorization, required, Utc::now())
    }

    pub fn authorize_at(
        &self,
        authorization: Option<&str>,
        required: Option<Role>,
        now: DateTime<Utc>,
    ) -> Result<AuthorizedIdentity, GateError> {
        let token = extract_bearer(authorization)
            .ok_or_else(|| GateError::Unauthenticated("missing bearer token".to_string()))?;

        let verified = self
            .tokens
            .verify_at(token, now)
            .map_err(|e| GateError::Unauthenticated(e.to_string()))?;

        if let Some(required) = required {
            if !verified.role.satisfies(required) {
                return Err(GateError::Forbidden {
                    required,
                    actual: verified.role,
                });
            }
        }

        Ok(AuthorizedIdentity {
            user_id: verified.user_id,
            role: verified.role,
        })
    }
}
