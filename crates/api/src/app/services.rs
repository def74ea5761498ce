use std::sync::Arc;

use rbac_auth::{
    AdminService, AuthError, AuthSessionManager, AuthorizationGate, CredentialStore, NewAccount,
    PasswordHasher, Role, TokenConfig, TokenService,
};

use crate::config::BootstrapAdmin;

/// Services shared by every handler.
///
/// The session manager, admin service and gate all see the same store and the
/// same token service.
#[derive(Clone)]
pub struct AppServices {
    pub sessions: AuthSessionManager,
    pub admin: AdminService,
    pub gate: AuthorizationGate,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        token_config: TokenConfig,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(token_config));
        Self {
            sessions: AuthSessionManager::new(store.clone(), hasher.clone(), tokens.clone()),
            admin: AdminService::new(store, hasher),
            gate: AuthorizationGate::new(tokens),
        }
    }

    /// Create the configured admin account unless its email is already registered.
    pub async fn ensure_admin(&self, bootstrap: &BootstrapAdmin) -> Result<(), AuthError> {
        let account = NewAccount {
            name: bootstrap.name.clone(),
            email: bootstrap.email.clone(),
            password: bootstrap.password.clone(),
            role: Role::Admin,
        };

        match self.admin.create_user(account).await {
            Ok(profile) => {
                tracing::info!(user_id = %profile.id, "bootstrap admin created");
                Ok(())
            }
            Err(AuthError::EmailTaken) => {
                tracing::info!("bootstrap admin already registered");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
