//! Layered environment configuration resolution.
//!
//! Loads `KEY=VALUE` configuration from an ordered set of sources — a mounted
//! secret file, a local development `.env`, and the ambient process
//! environment — and exposes one merged, immutable lookup surface
//! ([`ResolvedConfig`]). Runs once at process start; downstream consumers
//! (pool provisioning, service wiring) read from the snapshot instead of
//! touching `std::env` directly.

mod profile;
mod resolver;
mod source;

pub use profile::{EnvironmentProfile, PROFILE_ENV_KEY};
pub use resolver::{env_var_or_none, ResolvedConfig, Resolver};
pub use source::{ConfigSource, LOCAL_ENV_FILE, SECRET_ENV_PATH};
