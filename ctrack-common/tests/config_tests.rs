//! Tests for configuration loading and root folder resolution
//!
//! Tests that touch CTRACK_ROOT_FOLDER are marked #[serial] so they do not
//! race on the process environment.

use ctrack_common::config::{
    default_root_folder, RootFolderInitializer, RootFolderResolver, TomlConfig, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root = RootFolderResolver::new("test-module").resolve();

    assert_eq!(root, default_root_folder());
}

#[test]
#[serial]
fn test_resolver_env_var_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/ctrack-test-env-folder");
    let toml = TomlConfig::parse("root_folder = \"/tmp/ctrack-test-toml-folder\"").unwrap();

    let root = RootFolderResolver::new("test-module").with_toml(&toml).resolve();

    env::remove_var(ROOT_FOLDER_ENV);
    assert_eq!(root, PathBuf::from("/tmp/ctrack-test-env-folder"));
}

#[test]
#[serial]
fn test_resolver_cli_beats_env() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/ctrack-test-env-folder");

    let root = RootFolderResolver::new("test-module")
        .with_cli_arg(Some(PathBuf::from("/tmp/ctrack-test-cli-folder")))
        .resolve();

    env::remove_var(ROOT_FOLDER_ENV);
    assert_eq!(root, PathBuf::from("/tmp/ctrack-test-cli-folder"));
}

#[test]
#[serial]
fn test_resolver_toml_used_without_env() {
    env::remove_var(ROOT_FOLDER_ENV);
    let toml = TomlConfig::parse("root_folder = \"/tmp/ctrack-test-toml-folder\"").unwrap();

    let root = RootFolderResolver::new("test-module").with_toml(&toml).resolve();

    assert_eq!(root, PathBuf::from("/tmp/ctrack-test-toml-folder"));
}

#[test]
fn test_load_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let config = TomlConfig::load(Some(&dir.path().join("absent.toml")));

    assert!(config.root_folder.is_none());
    assert_eq!(config.server.port, 5730);
}

#[test]
fn test_load_malformed_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is [not valid toml").unwrap();

    let config = TomlConfig::load(Some(&path));

    assert_eq!(config.database.conflict_retries, 3);
}

#[test]
fn test_load_reads_values_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[logging]\nlevel = \"debug\"\n\n[database]\nbusy_timeout_ms = 750\n",
    )
    .unwrap();

    let config = TomlConfig::load(Some(&path));

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.database.busy_timeout_ms, 750);
}

#[test]
fn test_initializer_creates_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("a").join("b");

    let initializer = RootFolderInitializer::new(root.clone());
    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert_eq!(initializer.database_path(), root.join("ctrack.db"));
}
