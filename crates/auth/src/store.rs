//! Credential store port and the in-memory implementation used for dev/tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use rbac_core::UserId;

use crate::user::{normalize_email, NewUser, User, UserChanges};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("email already registered")]
    EmailTaken,

    #[error("user not found")]
    NotFound,

    #[error("storage error: {0}")]
    Backend(String),
}

/// Persistence for user accounts.
///
/// Implementations own email uniqueness: the uniqueness check and the write in
/// `create`/`update` must be a single atomic operation, and email comparison
/// is case-insensitive.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, StoreError>;

    async fn delete(&self, id: UserId) -> Result<(), StoreError>;

    /// All accounts, oldest first.
    async fn list_all(&self) -> Result<Vec<User>, StoreError>;
}

#[async_trait]
impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        (**self).create(user).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        (**self).find_by_email(email).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, StoreError> {
        (**self).update(id, changes).await
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        (**self).delete(id).await
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        (**self).list_all().await
    }
}

/// In-memory credential store for tests/dev.
///
/// Every mutation runs under one write lock, which makes check-then-write on
/// email uniqueness atomic.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<HashMap<UserId, User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

fn email_in_use(map: &HashMap<UserId, User>, email: &str, except: Option<UserId>) -> bool {
    map.values()
        .any(|u| Some(u.id) != except && u.email == email)
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let email = normalize_email(&user.email);
        let mut map = self.inner.write().map_err(poisoned)?;

        if email_in_use(&map, &email, None) {
            return Err(StoreError::EmailTaken);
        }

        let record = User {
            id: UserId::new(),
            name: user.name,
            email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        map.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = normalize_email(email);
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(&id).cloned())
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;

        let new_email = changes.email.as_deref().map(normalize_email);
        if let Some(email) = &new_email {
            if email_in_use(&map, email, Some(id)) {
                return Err(StoreError::EmailTaken);
            }
        }

        let record = map.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = changes.name {
            record.name = name;
        }
        if let Some(email) = new_email {
            record.email = email;
        }
        if let Some(role) = changes.role {
            record.role = role;
        }
        if let Some(hash) = changes.password_hash {
            record.password_hash = hash;
        }
        Ok(record.clone())
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        let mut users: Vec<User> = map.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }
}
