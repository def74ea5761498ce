use rbac_auth::{AuthorizedIdentity, Role};
use rbac_core::UserId;

/// Principal context for a request (identity admitted by the authorization gate).
///
/// Inserted by the auth middleware; present on every protected route.
#[derive(Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user_id: UserId,
    role: Role,
    token: String,
}

impl PrincipalContext {
    pub fn new(identity: AuthorizedIdentity, token: impl Into<String>) -> Self {
        Self {
            user_id: identity.user_id,
            role: identity.role,
            token: token.into(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The bearer token the request was admitted with.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl core::fmt::Debug for PrincipalContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrincipalContext")
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}
