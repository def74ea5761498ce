//! Server-side authentication flows: signup, login, current user, password change.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::instrument;

use crate::error::AuthError;
use crate::password::{hash_blocking, verify_blocking, PasswordError, PasswordHasher};
use crate::policy::PasswordPolicy;
use crate::store::{CredentialStore, StoreError};
use crate::token::{TokenError, TokenService};
use crate::user::{validate_email, validate_name, NewUser, User, UserChanges, UserProfile};
use crate::Role;

/// Hashed once per manager; unknown-email logins verify against it.
const DECOY_PASSWORD: &str = "decoy-password-never-assigned";

/// Result of a successful signup or login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

/// Orchestrates credential checks against the store, hasher and token service.
///
/// Every operation returns a typed [`AuthError`]; nothing panics past this
/// boundary.
#[derive(Clone)]
pub struct AuthSessionManager {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<TokenService>,
    policy: PasswordPolicy,
    decoy_digest: Arc<OnceCell<String>>,
}

impl AuthSessionManager {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            policy: PasswordPolicy::default(),
            decoy_digest: Arc::new(OnceCell::new()),
        }
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Public self-registration. The role is always [`Role::User`].
    #[instrument(skip_all, fields(email = %email))]
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let name = validate_name(name)?;
        let email = validate_email(email)?;
        self.policy.check(password)?;

        // Cheap pre-check so a taken email does not pay for a hash. The store's
        // atomic create still decides races.
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_blocking(self.hasher.clone(), password).await?;
        let user = self
            .store
            .create(NewUser {
                name,
                email,
                password_hash,
                role: Role::User,
            })
            .await?;

        tracing::info!(user_id = %user.id, "account registered");
        self.session_for(&user)
    }

    #[instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let found = self.store.find_by_email(email).await?;

        // An unknown email pays for a verify too, so timing does not tell it
        // apart from a wrong password.
        let digest = match &found {
            Some(user) => user.password_hash.clone(),
            None => self.decoy_digest().await?,
        };
        let matches = verify_blocking(self.hasher.clone(), password, &digest).await?;

        let user = match found {
            Some(user) if matches => user,
            _ => {
                tracing::info!("login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        tracing::info!(user_id = %user.id, "login succeeded");
        self.session_for(&user)
    }

    /// Profile of the token's subject, re-read from the store.
    ///
    /// Name and role come from the store, not from the token's claims.
    #[instrument(skip_all)]
    pub async fn current_user(&self, token: &str) -> Result<UserProfile, AuthError> {
        Ok(self.authenticated_user(token).await?.profile())
    }

    /// Existing tokens stay valid until they expire; no token is issued.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self.authenticated_user(token).await?;

        if !verify_blocking(self.hasher.clone(), current_password, &user.password_hash).await? {
            tracing::info!(user_id = %user.id, "password change rejected: wrong current password");
            return Err(AuthError::InvalidCredentials);
        }
        self.policy.check(new_password)?;

        let password_hash = hash_blocking(self.hasher.clone(), new_password).await?;
        self.store
            .update(user.id, UserChanges::password_hash(password_hash))
            .await
            .map_err(|e| match e {
                StoreError::NotFound => orphaned_token(),
                other => other.into(),
            })?;

        tracing::info!(user_id = %user.id, "password changed");
        Ok(())
    }

    async fn authenticated_user(&self, token: &str) -> Result<User, AuthError> {
        let verified = self.tokens.verify(token).map_err(AuthError::InvalidToken)?;

        match self.store.find_by_id(verified.user_id).await? {
            Some(user) => Ok(user),
            None => {
                tracing::info!(user_id = %verified.user_id, "token subject no longer exists");
                Err(orphaned_token())
            }
        }
    }

    async fn decoy_digest(&self) -> Result<String, PasswordError> {
        let hasher = self.hasher.clone();
        self.decoy_digest
            .get_or_try_init(|| hash_blocking(hasher, DECOY_PASSWORD))
            .await
            .cloned()
    }

    fn session_for(&self, user: &User) -> Result<AuthSession, AuthError> {
        let token = self
            .tokens
            .issue(user.id, user.role)
            .map_err(|e| AuthError::internal(e.to_string()))?;
        Ok(AuthSession {
            token,
            user: user.profile(),
        })
    }
}

fn orphaned_token() -> AuthError {
    AuthError::InvalidToken(TokenError::Invalid("account no longer exists".to_string()))
}
