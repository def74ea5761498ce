//! Process configuration, read from environment variables.

use std::net::SocketAddr;

use anyhow::{bail, Context};

use rbac_auth::TokenConfig;

const DEV_SECRET: &str = "dev-secret";
const DEFAULT_TTL_HOURS: i64 = 24;
/// One year.
const MAX_TTL_HOURS: i64 = 24 * 366;
const DEFAULT_ISSUER: &str = "rbac-demo";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ADMIN_NAME: &str = "Administrator";

/// Admin account created at startup when its email is not yet registered.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub token: TokenConfig,
    pub bind_addr: SocketAddr,
    /// Postgres connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_SECRET.to_string()
        });

        let ttl_hours = match get("TOKEN_TTL_HOURS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("TOKEN_TTL_HOURS must be an integer, got '{raw}'"))?,
            None => DEFAULT_TTL_HOURS,
        };
        if ttl_hours <= 0 {
            bail!("TOKEN_TTL_HOURS must be positive, got {ttl_hours}");
        }
        if ttl_hours > MAX_TTL_HOURS {
            bail!("TOKEN_TTL_HOURS must be at most {MAX_TTL_HOURS}, got {ttl_hours}");
        }
        let ttl = chrono::Duration::try_hours(ttl_hours)
            .with_context(|| format!("TOKEN_TTL_HOURS out of range: {ttl_hours}"))?;

        let issuer = get("TOKEN_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .with_context(|| format!("BIND_ADDR is not a socket address: '{bind_raw}'"))?;

        let bootstrap_admin = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin {
                name: get("ADMIN_NAME").unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string()),
                email,
                password,
            }),
            (None, None) => None,
            _ => bail!("ADMIN_EMAIL and ADMIN_PASSWORD must be set together"),
        };

        Ok(Self {
            token: TokenConfig {
                secret,
                ttl,
                issuer,
            },
            bind_addr,
            database_url: get("DATABASE_URL"),
            bootstrap_admin,
        })
    }
}
