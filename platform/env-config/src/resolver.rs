use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::profile::EnvironmentProfile;
use crate::source::{ConfigSource, LOCAL_ENV_FILE, SECRET_ENV_PATH};

/// Read an environment variable, returning None if unset, empty, or
/// whitespace-only. The returned value is trimmed.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Immutable merged configuration snapshot.
///
/// Built once at startup by [`Resolver::resolve`]. Lookups consult the
/// file-loaded entries first and fall back to the ambient process
/// environment, so values resolved from a secret mount or a local `.env`
/// shadow exported variables of the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    entries: BTreeMap<String, String>,
}

impl ResolvedConfig {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a key: file-loaded entries first, process environment second.
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.entries.get(key) {
            return Some(value.clone());
        }
        env_var_or_none(key)
    }

    /// Number of entries loaded from file sources (ambient variables are not
    /// counted; they are a fallback, not part of the snapshot).
    pub fn loaded_len(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<(String, String)> for ResolvedConfig {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        ResolvedConfig {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Resolves configuration from the ordered sources.
///
/// Source order: the secret mount short-circuits everything else for the run;
/// otherwise the local `.env` is consulted in non-production only. Production
/// without a secret mount relies on ambient variables supplied by the hosting
/// platform. File problems are never fatal here — provisioning validates the
/// keys it actually needs.
#[derive(Debug, Clone)]
pub struct Resolver {
    profile: EnvironmentProfile,
    secret_path: PathBuf,
    local_path: PathBuf,
}

impl Resolver {
    /// Resolver over the well-known paths.
    pub fn new(profile: EnvironmentProfile) -> Self {
        Self::with_paths(profile, SECRET_ENV_PATH, LOCAL_ENV_FILE)
    }

    /// Resolver over explicit paths.
    pub fn with_paths(
        profile: EnvironmentProfile,
        secret_path: impl Into<PathBuf>,
        local_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            profile,
            secret_path: secret_path.into(),
            local_path: local_path.into(),
        }
    }

    /// Build the merged snapshot. Idempotent: repeated calls over unchanged
    /// sources yield equal snapshots.
    pub fn resolve(&self) -> ResolvedConfig {
        let mut entries = BTreeMap::new();

        // Secret mount presence ends resolution for this run, even when the
        // file turns out to be partially unparseable.
        if self.secret_path.exists() {
            let source = ConfigSource::SecretFile(self.secret_path.clone());
            load_file(&source, &self.secret_path, &mut entries);
            return ResolvedConfig { entries };
        }

        match self.profile {
            EnvironmentProfile::Production => {
                tracing::info!(
                    source = %ConfigSource::ProcessEnvironment,
                    "no secret mount; relying on ambient variables"
                );
            }
            EnvironmentProfile::NonProduction => {
                let source = ConfigSource::LocalFile(self.local_path.clone());
                load_file(&source, &self.local_path, &mut entries);
            }
        }

        ResolvedConfig { entries }
    }
}

/// Parse a `KEY=VALUE` file into the snapshot, first occurrence of a key
/// winning. Logs how many entries each source contributed; log lines carry
/// key counts and parse offsets only, never values or raw line contents.
fn load_file(source: &ConfigSource, path: &Path, entries: &mut BTreeMap<String, String>) {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if is_not_found(&err) => {
            tracing::debug!(source = %source, "configuration source not present");
            return;
        }
        Err(err) => {
            tracing::warn!(source = %source, error = %err, "could not open configuration source");
            return;
        }
    };

    let mut loaded = 0usize;
    for item in iter {
        match item {
            Ok((key, value)) => {
                if let Entry::Vacant(slot) = entries.entry(key) {
                    slot.insert(value);
                    loaded += 1;
                }
            }
            Err(dotenvy::Error::LineParse(_, offset)) => {
                tracing::warn!(
                    source = %source,
                    offset,
                    "malformed entry; keeping the values resolved so far"
                );
                break;
            }
            Err(err) => {
                tracing::warn!(source = %source, error = %err, "read error; keeping the values resolved so far");
                break;
            }
        }
    }

    tracing::info!(source = %source, entries = loaded, "configuration entries loaded");
}

fn is_not_found(err: &dotenvy::Error) -> bool {
    matches!(err, dotenvy::Error::Io(io_err) if io_err.kind() == ErrorKind::NotFound)
}
