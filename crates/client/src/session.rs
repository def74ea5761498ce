//! Client session state machine.
//!
//! `Unknown → Verifying → Authenticated | Anonymous`. The session is the only
//! holder of the current token; API calls receive it as an argument.

use std::sync::Arc;

use rbac_auth::{AuthSession, Role, UserProfile};

use crate::api::AuthApi;
use crate::error::ClientError;
use crate::storage::TokenStorage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Startup, before the persisted token has been looked at.
    Unknown,
    /// A persisted token is being checked against the server.
    Verifying,
    Authenticated { token: String, user: UserProfile },
    Anonymous,
}

pub struct ClientSession {
    state: SessionState,
    storage: Arc<dyn TokenStorage>,
}

impl ClientSession {
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            state: SessionState::Unknown,
            storage,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match &self.state {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Unknown | SessionState::Verifying)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|u| u.role == Role::Admin)
    }

    /// Restore a persisted session at startup.
    ///
    /// Any failure to confirm the stored token (rejected, unreachable server,
    /// unreadable storage) leaves the session anonymous with the token discarded.
    pub async fn rehydrate(&mut self, api: &dyn AuthApi) -> &SessionState {
        self.state = SessionState::Verifying;

        let stored = match self.storage.load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted token");
                None
            }
        };

        let Some(token) = stored else {
            self.state = SessionState::Anonymous;
            return &self.state;
        };

        match api.me(&token).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "session restored");
                self.state = SessionState::Authenticated { token, user };
            }
            Err(e) => {
                tracing::info!(error = %e, "persisted token rejected; signing out");
                self.logout();
            }
        }
        &self.state
    }

    /// Enter the authenticated state and persist the token.
    pub fn login(&mut self, session: AuthSession) -> Result<(), ClientError> {
        self.storage.save(&session.token)?;
        self.state = SessionState::Authenticated {
            token: session.token,
            user: session.user,
        };
        Ok(())
    }

    /// Drop the session. The persisted token is removed before this returns.
    pub fn logout(&mut self) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "failed to remove persisted token");
        }
        self.state = SessionState::Anonymous;
    }

    /// React to an API error. Returns `true` when the session was cleared.
    ///
    /// 401 signs the user out; 403 and everything else leave the session alone.
    pub fn handle_error(&mut self, err: &ClientError) -> bool {
        if err.is_unauthenticated() && !matches!(self.state, SessionState::Anonymous) {
            self.logout();
            return true;
        }
        false
    }

    /// Re-read the profile for the current token (e.g. after a role change).
    pub async fn refresh(&mut self, api: &dyn AuthApi) -> Result<(), ClientError> {
        let Some(token) = self.token().map(str::to_string) else {
            return Err(ClientError::Unauthenticated("not signed in".to_string()));
        };

        match api.me(&token).await {
            Ok(user) => {
                self.state = SessionState::Authenticated { token, user };
                Ok(())
            }
            Err(e) => {
                self.handle_error(&e);
                Err(e)
            }
        }
    }
}
