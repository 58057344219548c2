use std::fmt;
use std::path::PathBuf;

/// Fixed mount point for platform-provided secret files.
pub const SECRET_ENV_PATH: &str = "/etc/secrets/.env";

/// Development environment file, relative to the working directory.
pub const LOCAL_ENV_FILE: &str = ".env";

/// An ordered provider of `KEY=VALUE` configuration pairs.
///
/// File sources are optional; absence is not an error. The process
/// environment is always available and has the lowest override priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    SecretFile(PathBuf),
    LocalFile(PathBuf),
    ProcessEnvironment,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::SecretFile(path) => write!(f, "secret file {}", path.display()),
            ConfigSource::LocalFile(path) => write!(f, "local file {}", path.display()),
            ConfigSource::ProcessEnvironment => write!(f, "process environment"),
        }
    }
}
