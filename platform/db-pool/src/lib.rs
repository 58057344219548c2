//! Profile-aware PostgreSQL pool provisioning.
//!
//! Consumes the merged lookup surface from `env-config` plus the active
//! [`EnvironmentProfile`](env_config::EnvironmentProfile), picks the
//! connection-target strategy for that profile, and builds one lazily
//! connecting [`sqlx::PgPool`] with a fixed per-profile policy. Runs once at
//! boot; the returned pool is the application's long-lived shared handle.

mod descriptor;
mod policy;
mod provision;

pub use descriptor::ConnectionDescriptor;
pub use policy::PoolPolicy;
pub use provision::{
    provision, resolve_descriptor, ConfigurationError, DATABASE_PASSWORD_KEY, DATABASE_URL_KEY,
    DATABASE_USER_KEY,
};

pub use sqlx::PgPool;
