use std::fmt;

/// Environment variable selecting the active profile.
pub const PROFILE_ENV_KEY: &str = "APP_ENV";

/// Deployment profile, fixed for the process lifetime.
///
/// Drives which configuration sources are consulted and which pool policy
/// applies. Derived once at startup from [`PROFILE_ENV_KEY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentProfile {
    Production,
    NonProduction,
}

impl EnvironmentProfile {
    /// Read the profile from the process environment.
    ///
    /// Unset or unrecognized values select [`EnvironmentProfile::NonProduction`],
    /// so a developer machine needs no profile variable at all.
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(PROFILE_ENV_KEY).ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("production") | Some("prod") => EnvironmentProfile::Production,
            _ => EnvironmentProfile::NonProduction,
        }
    }

    pub fn is_production(self) -> bool {
        self == EnvironmentProfile::Production
    }
}

impl fmt::Display for EnvironmentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentProfile::Production => write!(f, "production"),
            EnvironmentProfile::NonProduction => write!(f, "non-production"),
        }
    }
}
