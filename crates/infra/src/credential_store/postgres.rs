//! Postgres-backed credential store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `EmailTaken` | Email already registered (unique index on `lower(email)`) |
//! | Database (other) | Any other | `Backend` | Constraint or query failure |
//! | PoolClosed / other | N/A | `Backend` | Network errors, connection failures, etc. |
//!
//! Email uniqueness is enforced by the database, so the check and the write are
//! one atomic statement even across concurrent requests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::{instrument, Span};

use rbac_auth::{normalize_email, CredentialStore, NewUser, Role, StoreError, User, UserChanges};
use rbac_core::UserId;

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            UUID PRIMARY KEY,
        name          TEXT NOT NULL,
        email         TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        role          TEXT NOT NULL CHECK (role IN ('user', 'admin')),
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS users_email_lower_key ON users (lower(email))
    "#,
];

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at";

/// Postgres-backed [`CredentialStore`].
///
/// Uses SQLx connection pool which is thread-safe (Arc + Send + Sync).
#[derive(Debug, Clone)]
pub struct PostgresCredentialStore {
    pool: Arc<PgPool>,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `users` table and its case-insensitive email index if missing.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    #[instrument(skip_all, fields(user_id = tracing::field::Empty), err)]
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (id, name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(*UserId::new().as_uuid())
        .bind(&user.name)
        .bind(normalize_email(&user.email))
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_user", e))?;

        let user = UserRow::from_row(&row)?.into_user()?;
        Span::current().record("user_id", tracing::field::display(user.id));
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = $1"
        ))
        .bind(normalize_email(email))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_email", e))?;

        row.map(|r| UserRow::from_row(&r)?.into_user()).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.map(|r| UserRow::from_row(&r)?.into_user()).transpose()
    }

    #[instrument(skip(self, changes), fields(user_id = %id), err)]
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                role = COALESCE($4, role), \
                password_hash = COALESCE($5, password_hash) \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(*id.as_uuid())
        .bind(changes.name)
        .bind(changes.email.as_deref().map(normalize_email))
        .bind(changes.role.map(|r| r.as_str()))
        .bind(changes.password_hash)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_user", e))?
        .ok_or(StoreError::NotFound)?;

        UserRow::from_row(&row)?.into_user()
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_user", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_users", e))?;

        rows.iter()
            .map(|r| UserRow::from_row(r)?.into_user())
            .collect()
    }
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                StoreError::EmailTaken
            } else {
                StoreError::Backend(format!("database error in {}: {}", operation, db_err.message()))
            }
        }
        sqlx::Error::PoolClosed => StoreError::Backend(format!("connection pool closed in {}", operation)),
        other => StoreError::Backend(format!("sqlx error in {}: {}", operation, other)),
    }
}

// SQLx row types

#[derive(Debug)]
struct UserRow {
    id: uuid::Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, StoreError> {
        let read = |e: sqlx::Error| StoreError::Backend(format!("failed to read user row: {}", e));
        Ok(UserRow {
            id: row.try_get("id").map_err(read)?,
            name: row.try_get("name").map_err(read)?,
            email: row.try_get("email").map_err(read)?,
            password_hash: row.try_get("password_hash").map_err(read)?,
            role: row.try_get("role").map_err(read)?,
            created_at: row.try_get("created_at").map_err(read)?,
        })
    }

    fn into_user(self) -> Result<User, StoreError> {
        let role: Role = self
            .role
            .parse()
            .map_err(|e| StoreError::Backend(format!("corrupt user row {}: {}", self.id, e)))?;

        Ok(User {
            id: UserId::from_uuid(self.id),
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role,
            created_at: self.created_at,
        })
    }
}
