use std::sync::Arc;

use anyhow::Context;

use rbac_api::app::{build_app, AppServices};
use rbac_api::config::ApiConfig;
use rbac_auth::{Argon2PasswordHasher, CredentialStore, InMemoryCredentialStore};
use rbac_infra::PostgresCredentialStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rbac_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;

    let store: Arc<dyn CredentialStore> = match &config.database_url {
        Some(url) => {
            let pool = rbac_infra::connect(url)
                .await
                .context("failed to connect to DATABASE_URL")?;
            let store = PostgresCredentialStore::new(pool);
            store.ensure_schema().await.context("failed to prepare users schema")?;
            tracing::info!("using postgres credential store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; accounts are kept in memory only");
            Arc::new(InMemoryCredentialStore::new())
        }
    };

    let services = Arc::new(AppServices::new(
        store,
        Arc::new(Argon2PasswordHasher::new()),
        config.token.clone(),
    ));

    if let Some(admin) = &config.bootstrap_admin {
        services
            .ensure_admin(admin)
            .await
            .context("failed to create bootstrap admin")?;
    }

    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
