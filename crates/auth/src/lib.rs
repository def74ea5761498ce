//! `rbac-auth`: accounts, sessions and role-based authorization.
//!
//! This crate is decoupled from HTTP; storage is reached only through the
//! [`CredentialStore`] port.

pub mod admin;
pub mod authorize;
pub mod claims;
pub mod error;
pub mod password;
pub mod policy;
pub mod roles;
pub mod session;
pub mod store;
pub mod token;
pub mod user;

pub use admin::{AccountUpdate, AdminService, NewAccount};
pub use authorize::{extract_bearer, AuthorizationGate, AuthorizedIdentity, GateError};
pub use claims::{validate_claims, ClaimsValidationError, TokenClaims};
pub use error::AuthError;
pub use password::{Argon2PasswordHasher, PasswordError, PasswordHasher};
pub use policy::{PasswordPolicy, PolicyViolation};
pub use roles::{Role, UnknownRole};
pub use session::{AuthSession, AuthSessionManager};
pub use store::{CredentialStore, InMemoryCredentialStore, StoreError};
pub use token::{TokenConfig, TokenError, TokenService, VerifiedToken};
pub use user::{normalize_email, NewUser, User, UserChanges, UserProfile};
