//! Account administration (admin console operations).
//!
//! Callers must have passed the authorization gate with `Role::Admin`; this
//! service does not re-check the caller's role.

use std::sync::Arc;

use tracing::instrument;

use rbac_core::UserId;

use crate::error::AuthError;
use crate::password::{hash_blocking, PasswordHasher};
use crate::policy::PasswordPolicy;
use crate::store::CredentialStore;
use crate::user::{validate_email, validate_name, NewUser, UserChanges, UserProfile};
use crate::Role;

/// Admin-initiated account creation. Unlike public signup, the role is chosen.
#[derive(Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Admin edit of an existing account (password is not editable here).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountUpdate {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    policy: PasswordPolicy,
}

impl AdminService {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            hasher,
            policy: PasswordPolicy::default(),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<UserProfile>, AuthError> {
        let users = self.store.list_all().await?;
        Ok(users.iter().map(|u| u.profile()).collect())
    }

    #[instrument(skip_all, fields(email = %account.email, role = %account.role))]
    pub async fn create_user(&self, account: NewAccount) -> Result<UserProfile, AuthError> {
        let name = validate_name(&account.name)?;
        let email = validate_email(&account.email)?;
        self.policy.check(&account.password)?;

        let password_hash = hash_blocking(self.hasher.clone(), &account.password).await?;
        let user = self
            .store
            .create(NewUser {
                name,
                email,
                password_hash,
                role: account.role,
            })
            .await?;

        tracing::info!(user_id = %user.id, "account created by admin");
        Ok(user.profile())
    }

    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn update_user(&self, id: UserId, update: AccountUpdate) -> Result<UserProfile, AuthError> {
        let changes = UserChanges {
            name: Some(validate_name(&update.name)?),
            email: Some(validate_email(&update.email)?),
            role: Some(update.role),
            password_hash: None,
        };

        let user = self.store.update(id, changes).await?;
        tracing::info!(role = %user.role, "account updated by admin");
        Ok(user.profile())
    }

    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), AuthError> {
        self.store.delete(id).await?;
        tracing::info!("account deleted by admin");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::test_hasher;
    use crate::policy::PolicyViolation;
    use crate::session::tests::manager_with_store;

    fn account(email: &str, role: Role) -> NewAccount {
        NewAccount {
            name: "Bob".into(),
            email: email.into(),
            password: "Abc123".into(),
            role,
        }
    }

    fn update(name: &str, email: &str, role: Role) -> AccountUpdate {
        AccountUpdate {
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    #[tokio::test]
    async fn admin_can_choose_role_and_new_account_can_log_in() {
        let (manager, store) = manager_with_store();
        let admin = AdminService::new(store.clone(), Arc::new(test_hasher()));

        let created = admin.create_user(account("boss@x.com", Role::Admin)).await.unwrap();
        assert_eq!(created.role, Role::Admin);

        let session = manager.login("boss@x.com", "Abc123").await.unwrap();
        assert_eq!(manager.tokens().verify(&session.token).unwrap().role, Role::Admin);
    }

    #[tokio::test]
    async fn create_enforces_policy_and_uniqueness() {
        let (_, store) = manager_with_store();
        let admin = AdminService::new(store.clone(), Arc::new(test_hasher()));

        let mut weak = account("a@x.com", Role::User);
        weak.password = "abc".into();
        assert_eq!(
            admin.create_user(weak).await.unwrap_err(),
            AuthError::WeakPassword(PolicyViolation::TooShort { min: 6 })
        );

        admin.create_user(account("a@x.com", Role::User)).await.unwrap();
        assert_eq!(
            admin.create_user(account("A@x.com", Role::Admin)).await.unwrap_err(),
            AuthError::EmailTaken
        );
        assert_eq!(admin.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_changes_profile_and_guards_email() {
        let (_, store) = manager_with_store();
        let admin = AdminService::new(store.clone(), Arc::new(test_hasher()));
        let a = admin.create_user(account("a@x.com", Role::User)).await.unwrap();
        admin.create_user(account("b@x.com", Role::User)).await.unwrap();

        let updated = admin
            .update_user(a.id, update("Alice", "alice@x.com", Role::Admin))
            .await
            .unwrap();
        assert_eq!(updated.name, "Alice");
        assert_eq!(updated.email, "alice@x.com");
        assert_eq!(updated.role, Role::Admin);

        assert_eq!(
            admin.update_user(a.id, update("Alice", "B@X.com", Role::Admin)).await.unwrap_err(),
            AuthError::EmailTaken
        );
        assert_eq!(
            admin.update_user(UserId::new(), update("Ghost", "g@x.com", Role::User)).await.unwrap_err(),
            AuthError::NotFound
        );
    }

    #[tokio::test]
    async fn delete_removes_account_and_invalidates_its_token() {
        let (manager, store) = manager_with_store();
        let admin = AdminService::new(store.clone(), Arc::new(test_hasher()));
        let session = manager.signup("Alice", "a@x.com", "Abc123").await.unwrap();

        admin.delete_user(session.user.id).await.unwrap();

        assert!(admin.list_users().await.unwrap().is_empty());
        assert!(matches!(
            manager.current_user(&session.token).await,
            Err(AuthError::InvalidToken(_))
        ));
        assert_eq!(admin.delete_user(session.user.id).await.unwrap_err(), AuthError::NotFound);
    }

    #[tokio::test]
    async fn alice_scenario_promotion_is_visible_on_next_lookup() {
        let (manager, store) = manager_with_store();
        let admin = AdminService::new(store.clone(), Arc::new(test_hasher()));

        let signup = manager.signup("Alice", "a@x.com", "Abc123").await.unwrap();
        assert_eq!(signup.user.role, Role::User);
        assert_eq!(
            manager.login("a@x.com", "wrong").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
        let login = manager.login("a@x.com", "Abc123").await.unwrap();

        let me = manager.current_user(&login.token).await.unwrap();
        assert_eq!((me.name.as_str(), me.role), ("Alice", Role::User));

        admin
            .update_user(me.id, update("Alice", "a@x.com", Role::Admin))
            .await
            .unwrap();

        let me = manager.current_user(&login.token).await.unwrap();
        assert_eq!(me.role, Role::Admin);
    }
}
