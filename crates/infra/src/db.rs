//! Database connection pool.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::instrument;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Open a Postgres pool for `database_url`.
#[instrument(skip_all)]
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    tracing::info!(max_connections = DEFAULT_MAX_CONNECTIONS, "database pool ready");
    Ok(pool)
}
