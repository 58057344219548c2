use std::time::Duration;

use env_config::EnvironmentProfile;

/// Fixed pool knobs attached to every connection descriptor.
///
/// Values differ by profile but are compile-time constants, not runtime
/// configuration. Statement caching is 0 on every policy: the database may
/// sit behind a transaction-pooling proxy that breaks with client-side
/// prepared-statement caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolPolicy {
    pub max_connections: u32,
    pub min_connections: u32,
    /// Bounds later pool borrows, not provisioning itself.
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    /// Acquires slower than this get a warning log — the observable symptom
    /// of connections being held (leaked) out of the pool.
    pub leak_detection_threshold: Option<Duration>,
    pub statement_cache_capacity: usize,
    /// Statement executed on a connection before every borrow.
    pub probe_query: Option<&'static str>,
}

impl PoolPolicy {
    /// Conservative policy for constrained production hosting tiers.
    pub const PRODUCTION: PoolPolicy = PoolPolicy {
        max_connections: 5,
        min_connections: 1,
        acquire_timeout: Duration::from_secs(30),
        idle_timeout: Duration::from_secs(120),
        max_lifetime: Duration::from_secs(1800),
        leak_detection_threshold: Some(Duration::from_secs(5)),
        statement_cache_capacity: 0,
        probe_query: Some("SELECT 1"),
    };

    /// Roomier policy for local development.
    pub const DEVELOPMENT: PoolPolicy = PoolPolicy {
        max_connections: 10,
        min_connections: 2,
        acquire_timeout: Duration::from_secs(60),
        idle_timeout: Duration::from_secs(300),
        max_lifetime: Duration::from_secs(1200),
        leak_detection_threshold: None,
        statement_cache_capacity: 0,
        probe_query: None,
    };

    pub fn for_profile(profile: EnvironmentProfile) -> PoolPolicy {
        match profile {
            EnvironmentProfile::Production => PoolPolicy::PRODUCTION,
            EnvironmentProfile::NonProduction => PoolPolicy::DEVELOPMENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_caching_disabled_on_every_policy() {
        assert_eq!(PoolPolicy::PRODUCTION.statement_cache_capacity, 0);
        assert_eq!(PoolPolicy::DEVELOPMENT.statement_cache_capacity, 0);
    }

    #[test]
    fn test_production_policy_is_conservative() {
        let policy = PoolPolicy::for_profile(EnvironmentProfile::Production);
        assert_eq!(policy, PoolPolicy::PRODUCTION);
        assert!(policy.max_connections < PoolPolicy::DEVELOPMENT.max_connections);
        assert!(policy.leak_detection_threshold.unwrap() > Duration::ZERO);
        assert_eq!(policy.probe_query, Some("SELECT 1"));
    }

    #[test]
    fn test_development_policy_skips_probe_and_leak_detection() {
        let policy = PoolPolicy::for_profile(EnvironmentProfile::NonProduction);
        assert_eq!(policy, PoolPolicy::DEVELOPMENT);
        assert_eq!(policy.leak_detection_threshold, None);
        assert_eq!(policy.probe_query, None);
    }
}
