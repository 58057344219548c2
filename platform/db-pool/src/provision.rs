use std::str::FromStr;

use env_config::{EnvironmentProfile, ResolvedConfig};
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use thiserror::Error;

use crate::descriptor::ConnectionDescriptor;
use crate::policy::PoolPolicy;

/// Connection string key. Production expects credentials embedded in it.
pub const DATABASE_URL_KEY: &str = "DATABASE_URL";
/// Separate credential keys, consulted on the non-production path only.
pub const DATABASE_USER_KEY: &str = "DATABASE_USER";
pub const DATABASE_PASSWORD_KEY: &str = "DATABASE_PASSWORD";

/// Fatal provisioning failure: the process must not start without a usable
/// database target. Messages name the key and active profile, never values.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Required key absent from the hosting environment (production path).
    #[error("{key} is not set or empty in the hosting environment (active profile: {profile})")]
    MissingEnvironmentKey {
        key: &'static str,
        profile: EnvironmentProfile,
    },
    /// Required key absent after file-based resolution (development path).
    #[error("{key} was not resolved; configuration loading did not succeed (active profile: {profile})")]
    UnresolvedKey {
        key: &'static str,
        profile: EnvironmentProfile,
    },
    #[error("{key} does not parse as a PostgreSQL connection string (active profile: {profile})")]
    InvalidTarget {
        key: &'static str,
        profile: EnvironmentProfile,
        #[source]
        source: sqlx::Error,
    },
}

/// Pick the connection-target strategy for the profile and assemble the
/// descriptor. Fails fast when a required key is missing or empty.
pub fn resolve_descriptor(
    profile: EnvironmentProfile,
    config: &ResolvedConfig,
) -> Result<ConnectionDescriptor, ConfigurationError> {
    let policy = PoolPolicy::for_profile(profile);
    match profile {
        EnvironmentProfile::Production => {
            // One pre-assembled URL with embedded credentials; no overlay of
            // separate username/password fields.
            let url = required(config, DATABASE_URL_KEY).ok_or(
                ConfigurationError::MissingEnvironmentKey {
                    key: DATABASE_URL_KEY,
                    profile,
                },
            )?;
            Ok(ConnectionDescriptor {
                url,
                username: None,
                password: None,
                policy,
            })
        }
        EnvironmentProfile::NonProduction => {
            // Everything comes through the resolved snapshot, which local
            // development populates from a loaded file.
            let url =
                required(config, DATABASE_URL_KEY).ok_or(ConfigurationError::UnresolvedKey {
                    key: DATABASE_URL_KEY,
                    profile,
                })?;
            let username = required(config, DATABASE_USER_KEY);
            let password = required(config, DATABASE_PASSWORD_KEY).map(SecretString::from);
            Ok(ConnectionDescriptor {
                url,
                username,
                password,
                policy,
            })
        }
    }
}

/// Resolve the descriptor and build the pool handle.
///
/// Pool assembly is synchronous: sockets open lazily on first borrow, so the
/// policy's acquire timeout governs later borrows, not this call. Must run
/// inside the host's tokio runtime (sqlx spawns the pool reaper here).
pub fn provision(
    profile: EnvironmentProfile,
    config: &ResolvedConfig,
) -> Result<PgPool, ConfigurationError> {
    let descriptor = resolve_descriptor(profile, config)?;
    tracing::info!(
        %profile,
        target = %descriptor.redacted_target(),
        "database target resolved"
    );
    build_pool(&descriptor, profile)
}

fn required(config: &ResolvedConfig, key: &str) -> Option<String> {
    config.get(key).filter(|value| !value.trim().is_empty())
}

fn build_pool(
    descriptor: &ConnectionDescriptor,
    profile: EnvironmentProfile,
) -> Result<PgPool, ConfigurationError> {
    let mut connect = PgConnectOptions::from_str(&descriptor.url)
        .map_err(|source| ConfigurationError::InvalidTarget {
            key: DATABASE_URL_KEY,
            profile,
            source,
        })?
        .statement_cache_capacity(descriptor.policy.statement_cache_capacity);

    if let Some(username) = &descriptor.username {
        connect = connect.username(username);
    }
    if let Some(password) = &descriptor.password {
        connect = connect.password(password.expose_secret());
    }

    let policy = descriptor.policy;
    let mut options = PgPoolOptions::new()
        .max_connections(policy.max_connections)
        .min_connections(policy.min_connections)
        .acquire_timeout(policy.acquire_timeout)
        .idle_timeout(policy.idle_timeout)
        .max_lifetime(policy.max_lifetime);

    if let Some(threshold) = policy.leak_detection_threshold {
        options = options.acquire_slow_threshold(threshold);
    }
    if let Some(query) = policy.probe_query {
        options = options.before_acquire(move |conn, _meta| {
            Box::pin(async move {
                sqlx::query(query).execute(&mut *conn).await?;
                Ok(true)
            })
        });
    }

    Ok(options.connect_lazy_with(connect))
}
