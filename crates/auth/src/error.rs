use thiserror::Error;

use rbac_core::DomainError;

use crate::password::PasswordError;
use crate::policy::PolicyViolation;
use crate::store::StoreError;
use crate::token::TokenError;

/// Errors returned by the session manager and the admin service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password. One variant for both cases so callers
    /// cannot tell them apart.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists with this email")]
    EmailTaken,

    #[error("{0}")]
    WeakPassword(PolicyViolation),

    /// Bad, expired, or orphaned (account deleted) token. Forces re-login.
    #[error("Invalid or expired token")]
    InvalidToken(TokenError),

    #[error("User not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    /// Store, hasher or signing failure. Details are logged, not returned.
    #[error("internal error")]
    Internal(String),
}

impl AuthError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::EmailTaken => AuthError::EmailTaken,
            StoreError::NotFound => AuthError::NotFound,
            StoreError::Backend(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(value: PasswordError) -> Self {
        AuthError::Internal(value.to_string())
    }
}

impl From<PolicyViolation> for AuthError {
    fn from(value: PolicyViolation) -> Self {
        AuthError::WeakPassword(value)
    }
}

impl From<DomainError> for AuthError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound => AuthError::NotFound,
            DomainError::Validation(msg) => AuthError::Validation(msg),
            DomainError::InvalidId(msg) => AuthError::Validation(msg),
        }
    }
}
