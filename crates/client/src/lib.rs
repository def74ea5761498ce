//! `rbac-client`: client-side session handling for the RBAC API.
//!
//! The HTTP client never holds a default token: every authenticated call takes
//! the bearer token explicitly, and the [`ClientSession`] decides which token
//! to pass.

pub mod api;
pub mod error;
pub mod guard;
pub mod session;
pub mod storage;

pub use api::{AuthApi, CreateUserPayload, HttpAuthApi, UpdateUserPayload};
pub use error::ClientError;
pub use guard::{guard, landing_route, validate_password_change, GuardDecision};
pub use session::{ClientSession, SessionState};
pub use storage::{FileTokenStorage, InMemoryTokenStorage, TokenStorage, TOKEN_KEY};
