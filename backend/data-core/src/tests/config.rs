use crate::config::{BASE_URL_ENV_VAR, DATABASE_PATH_ENV_VAR, RepositoryConfig};
use crate::error::ConfigError;

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;

#[test]
fn given_no_config_file_when_loaded_then_defaults_are_returned() {
    let dir = TempDir::new().unwrap();

    let config = RepositoryConfig::load(dir.path()).unwrap();

    assert_eq!(config, RepositoryConfig::default());
    assert_eq!(config.remote.timeout_secs, 30);
    assert_eq!(config.remote.base_url, crate::DEFAULT_REMOTE_BASE_URL);
}

#[test]
fn given_partial_toml_when_loaded_then_missing_values_use_defaults() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("repository.toml"),
        r#"
[remote]
base_url = "https://api.example.com/v1/"
api_token_env = "EXAMPLE_TOKEN"

[local]
database_path = "/var/lib/app/cache.db"
"#,
    )
    .unwrap();

    // WHEN
    let config = RepositoryConfig::load(dir.path()).unwrap();

    // THEN
    assert_eq!(config.version, 1);
    assert_eq!(config.remote.base_url, "https://api.example.com/v1/");
    assert_eq!(config.remote.timeout_secs, 30);
    assert_eq!(config.remote.api_token_env.as_deref(), Some("EXAMPLE_TOKEN"));
    assert_eq!(
        config.database_path().unwrap(),
        PathBuf::from("/var/lib/app/cache.db")
    );
}

#[test]
fn given_broken_toml_when_loaded_then_parse_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("repository.toml"), "[remote\nbase_url = ").unwrap();

    let result = RepositoryConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: Verifies out-of-range values are rejected at load time.
///
/// **BUG THIS CATCHES**: Would catch a zero timeout reaching reqwest, which makes
/// every remote call fail immediately.
#[test]
fn given_invalid_values_when_validated_then_validation_error() {
    let mut zero_timeout = RepositoryConfig::default();
    zero_timeout.remote.timeout_secs = 0;

    let mut ftp_url = RepositoryConfig::default();
    ftp_url.remote.base_url = "ftp://files.example.com/".to_string();

    let mut future_version = RepositoryConfig::default();
    future_version.version = 2;

    let mut blank_token_var = RepositoryConfig::default();
    blank_token_var.remote.api_token_env = Some("  ".to_string());

    for config in [zero_timeout, ftp_url, future_version, blank_token_var] {
        assert!(
            matches!(config.validate(), Err(ConfigError::ValidationError { .. })),
            "{config:?} should be rejected"
        );
    }
}

#[test]
fn given_overrides_when_applied_then_blank_values_are_ignored() {
    let mut config = RepositoryConfig::default();

    config.apply_overrides(|key| match key {
        BASE_URL_ENV_VAR => Some("https://override.example.com/".to_string()),
        DATABASE_PATH_ENV_VAR => Some("   ".to_string()),
        _ => None,
    });

    assert_eq!(config.remote.base_url, "https://override.example.com/");
    assert_eq!(config.local.database_path, None);
}

#[test]
#[serial]
fn given_environment_variables_when_loaded_with_env_then_they_win_over_file() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("repository.toml"),
        "[remote]\nbase_url = \"https://file.example.com/\"\n",
    )
    .unwrap();
    // SAFETY: serialized with every other env-mutating test
    unsafe {
        std::env::set_var(BASE_URL_ENV_VAR, "https://env.example.com/");
        std::env::set_var(DATABASE_PATH_ENV_VAR, "/tmp/env.db");
    }

    // WHEN
    let result = RepositoryConfig::load_with_env(dir.path());
    unsafe {
        std::env::remove_var(BASE_URL_ENV_VAR);
        std::env::remove_var(DATABASE_PATH_ENV_VAR);
    }

    // THEN
    let config = result.unwrap();
    assert_eq!(config.remote.base_url, "https://env.example.com/");
    assert_eq!(config.local.database_path, Some(PathBuf::from("/tmp/env.db")));
}

#[test]
fn given_no_database_path_when_resolved_then_platform_data_dir_is_used() {
    let config = RepositoryConfig::default();

    if let Ok(path) = config.database_path() {
        assert!(path.ends_with("data-core/repository.db"), "{}", path.display());
    }
}
