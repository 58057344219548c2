use std::fs;
use std::path::PathBuf;

use env_config::{EnvironmentProfile, Resolver};
use serial_test::serial;
use tempfile::TempDir;

fn write_env_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write env file");
    path
}

fn missing_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

#[test]
#[serial]
fn test_secret_file_short_circuits_local_file_on_every_profile() {
    let dir = TempDir::new().unwrap();
    let secret = write_env_file(&dir, "secret.env", "RESOLVER_TEST_URL=postgres://secret-host/app\n");
    let local = write_env_file(
        &dir,
        "local.env",
        "RESOLVER_TEST_URL=postgres://local-host/app\nRESOLVER_TEST_LOCAL_ONLY=1\n",
    );

    for profile in [
        EnvironmentProfile::Production,
        EnvironmentProfile::NonProduction,
    ] {
        let config = Resolver::with_paths(profile, &secret, &local).resolve();
        assert_eq!(
            config.get("RESOLVER_TEST_URL").as_deref(),
            Some("postgres://secret-host/app"),
            "secret entries must win for {profile}",
        );
        assert_eq!(
            config.get("RESOLVER_TEST_LOCAL_ONLY"),
            None,
            "local file must not be read when the secret mount exists ({profile})",
        );
    }
}

#[test]
#[serial]
fn test_non_production_reads_local_file_when_secret_absent() {
    let dir = TempDir::new().unwrap();
    let secret = missing_path(&dir, "no-secret.env");
    let local = write_env_file(
        &dir,
        ".env",
        "RESOLVER_TEST_URL=postgres://localhost:5432/app\nRESOLVER_TEST_USER=dev\n",
    );

    let config =
        Resolver::with_paths(EnvironmentProfile::NonProduction, &secret, &local).resolve();
    assert_eq!(
        config.get("RESOLVER_TEST_URL").as_deref(),
        Some("postgres://localhost:5432/app")
    );
    assert_eq!(config.get("RESOLVER_TEST_USER").as_deref(), Some("dev"));
    assert_eq!(config.loaded_len(), 2);
}

#[test]
#[serial]
fn test_production_never_reads_local_file() {
    let dir = TempDir::new().unwrap();
    let secret = missing_path(&dir, "no-secret.env");
    let local = write_env_file(&dir, ".env", "RESOLVER_TEST_LOCAL_ONLY=1\n");

    let config = Resolver::with_paths(EnvironmentProfile::Production, &secret, &local).resolve();
    assert_eq!(config.get("RESOLVER_TEST_LOCAL_ONLY"), None);
    assert_eq!(config.loaded_len(), 0);
}

#[test]
#[serial]
fn test_malformed_local_file_keeps_entries_resolved_before_the_failure() {
    let dir = TempDir::new().unwrap();
    let secret = missing_path(&dir, "no-secret.env");
    let local = write_env_file(
        &dir,
        ".env",
        "RESOLVER_TEST_BEFORE=kept\nthis line is not a key value pair\nRESOLVER_TEST_AFTER=dropped\n",
    );

    let config =
        Resolver::with_paths(EnvironmentProfile::NonProduction, &secret, &local).resolve();
    assert_eq!(config.get("RESOLVER_TEST_BEFORE").as_deref(), Some("kept"));
    assert_eq!(config.get("RESOLVER_TEST_AFTER"), None);
}

#[test]
#[serial]
fn test_first_occurrence_of_a_key_wins() {
    let dir = TempDir::new().unwrap();
    let secret = write_env_file(
        &dir,
        "secret.env",
        "RESOLVER_TEST_DUP=first\nRESOLVER_TEST_DUP=second\n",
    );
    let local = missing_path(&dir, ".env");

    let config = Resolver::with_paths(EnvironmentProfile::Production, &secret, &local).resolve();
    assert_eq!(config.get("RESOLVER_TEST_DUP").as_deref(), Some("first"));
}

#[test]
#[serial]
fn test_resolution_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let secret = missing_path(&dir, "no-secret.env");
    let local = write_env_file(
        &dir,
        ".env",
        "RESOLVER_TEST_URL=postgres://localhost/app\nRESOLVER_TEST_USER=dev\n",
    );

    let resolver = Resolver::with_paths(EnvironmentProfile::NonProduction, &secret, &local);
    assert_eq!(resolver.resolve(), resolver.resolve());
}

#[test]
#[serial]
fn test_missing_sources_yield_an_empty_snapshot() {
    let dir = TempDir::new().unwrap();
    let secret = missing_path(&dir, "no-secret.env");
    let local = missing_path(&dir, "no-local.env");

    let config =
        Resolver::with_paths(EnvironmentProfile::NonProduction, &secret, &local).resolve();
    assert_eq!(config.loaded_len(), 0);
}
