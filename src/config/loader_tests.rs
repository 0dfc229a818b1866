//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("Failed to write test config");
    (dir, path)
}

// ===== File loading =====

#[test]
fn default_config_path_contains_txtreader_config_toml() {
    let Some(path) = default_config_path() else {
        return;
    };
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("txtreader") && path_str.ends_with("config.toml"),
        "Path should contain 'txtreader' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let (_dir, path) = write_config(
        r#"
library_dir = "/srv/books"
log_file_path = "/var/log/txtreader.log"
position_debounce_ms = 500
detection_sample_bytes = 8192
chapter_pattern = "^Chapter [0-9]+"
"#,
    );

    let config = load_config_file(&path)
        .expect("Should parse valid TOML")
        .expect("Should return Some for existing file");

    assert_eq!(config.library_dir, Some(PathBuf::from("/srv/books")));
    assert_eq!(config.log_file_path, Some(PathBuf::from("/var/log/txtreader.log")));
    assert_eq!(config.position_debounce_ms, Some(500));
    assert_eq!(config.detection_sample_bytes, Some(8192));
    assert_eq!(config.chapter_pattern.as_deref(), Some("^Chapter [0-9]+"));
}

#[test]
fn load_config_file_handles_partial_config() {
    let (_dir, path) = write_config("position_debounce_ms = 50\n");

    let config = load_config_file(&path).unwrap().unwrap();
    assert_eq!(config.position_debounce_ms, Some(50));
    assert_eq!(config.library_dir, None);
    assert_eq!(config.chapter_pattern, None);
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let (_dir, path) = write_config("this is not valid TOML ][}{");

    match load_config_file(&path) {
        Err(ConfigError::ParseError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

#[test]
fn load_config_file_rejects_unknown_keys() {
    let (_dir, path) = write_config("theme = \"dark\"\n");

    let result = load_config_file(&path);
    assert!(
        matches!(result, Err(ConfigError::ParseError { .. })),
        "Unknown keys should be rejected, got {:?}",
        result
    );
}

#[test]
fn load_config_file_reports_directory_as_read_error() {
    let dir = tempfile::tempdir().unwrap();

    let result = load_config_file(dir.path());
    assert!(
        matches!(result, Err(ConfigError::ReadError { .. })),
        "A directory is not a readable config file, got {:?}",
        result
    );
}

// ===== Merging =====

#[test]
fn merge_config_uses_defaults_when_none() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn merge_config_uses_defaults_for_empty_file() {
    assert_eq!(
        merge_config(Some(ConfigFile::default())),
        ResolvedConfig::default()
    );
}

#[test]
fn merge_config_overrides_with_config_file_values() {
    let config_file = ConfigFile {
        library_dir: Some(PathBuf::from("/books")),
        log_file_path: None,
        position_debounce_ms: Some(1000),
        detection_sample_bytes: None,
        chapter_pattern: Some("^CHAPTER".to_string()),
    };

    let resolved = merge_config(Some(config_file));
    let defaults = ResolvedConfig::default();

    assert_eq!(resolved.library_dir, PathBuf::from("/books"));
    assert_eq!(resolved.position_debounce_ms, 1000);
    assert_eq!(resolved.chapter_pattern, "^CHAPTER");
    assert_eq!(resolved.log_file_path, defaults.log_file_path);
    assert_eq!(resolved.detection_sample_bytes, defaults.detection_sample_bytes);
}

#[test]
fn defaults_match_documented_values() {
    let defaults = ResolvedConfig::default();
    assert_eq!(defaults.position_debounce_ms, 200);
    assert_eq!(defaults.position_debounce(), Duration::from_millis(200));
    assert_eq!(defaults.detection_sample_bytes, 4096);
    assert_eq!(defaults.chapter_pattern, DEFAULT_CHAPTER_PATTERN);
    assert!(defaults.library_dir.ends_with("txtreader"));
    assert!(defaults.log_file_path.ends_with("txtreader.log"));
}

#[test]
fn library_paths_derive_from_library_dir() {
    let config = ResolvedConfig {
        library_dir: PathBuf::from("/lib"),
        ..ResolvedConfig::default()
    };
    assert_eq!(config.catalog_path(), PathBuf::from("/lib/catalog.json"));
    assert_eq!(config.artifact_dir(), PathBuf::from("/lib/books"));
}

// ===== Chapter pattern =====

#[test]
fn default_pattern_compiles() {
    let indexer = ResolvedConfig::default().chapter_indexer().unwrap();
    assert!(indexer.is_heading("第十二章 风起"));
}

#[test]
fn invalid_pattern_is_reported() {
    let config = ResolvedConfig {
        chapter_pattern: "第(".to_string(),
        ..ResolvedConfig::default()
    };

    match config.chapter_indexer() {
        Err(ConfigError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "第("),
        other => panic!("Expected InvalidPattern, got {:?}", other.map(|_| ())),
    }
}

// ===== Precedence =====

#[test]
fn cli_override_replaces_library_dir() {
    let config = apply_cli_overrides(ResolvedConfig::default(), Some(PathBuf::from("/cli")));
    assert_eq!(config.library_dir, PathBuf::from("/cli"));
}

#[test]
fn cli_without_override_keeps_config() {
    let base = ResolvedConfig::default();
    assert_eq!(apply_cli_overrides(base.clone(), None), base);
}

#[test]
#[serial(txtreader_env)]
fn env_override_replaces_library_dir() {
    env::set_var(LIBRARY_DIR_ENV, "/from/env");
    let config = apply_env_overrides(ResolvedConfig::default());
    env::remove_var(LIBRARY_DIR_ENV);

    assert_eq!(config.library_dir, PathBuf::from("/from/env"));
}

#[test]
#[serial(txtreader_env)]
fn empty_env_override_is_ignored() {
    env::set_var(LIBRARY_DIR_ENV, "");
    let config = apply_env_overrides(ResolvedConfig::default());
    env::remove_var(LIBRARY_DIR_ENV);

    assert_eq!(config.library_dir, default_library_dir());
}

#[test]
#[serial(txtreader_env)]
fn explicit_path_wins_over_env_var() {
    let (_dir, explicit) = write_config("position_debounce_ms = 1\n");
    let (_env_dir, from_env) = write_config("position_debounce_ms = 2\n");

    env::set_var(CONFIG_ENV, &from_env);
    let loaded = load_config_with_precedence(Some(explicit));
    env::remove_var(CONFIG_ENV);

    assert_eq!(loaded.unwrap().unwrap().position_debounce_ms, Some(1));
}

#[test]
#[serial(txtreader_env)]
fn env_var_config_path_is_used() {
    let (_dir, path) = write_config("detection_sample_bytes = 64\n");

    env::set_var(CONFIG_ENV, &path);
    let loaded = load_config_with_precedence(None);
    env::remove_var(CONFIG_ENV);

    assert_eq!(loaded.unwrap().unwrap().detection_sample_bytes, Some(64));
}

#[test]
#[serial(txtreader_env)]
fn full_chain_applies_cli_last() {
    let (_dir, path) = write_config("library_dir = \"/from/file\"\nposition_debounce_ms = 7\n");

    env::set_var(LIBRARY_DIR_ENV, "/from/env");
    let resolved = resolve_config(Some(path.clone()), None);
    let with_cli = resolve_config(Some(path), Some(PathBuf::from("/from/cli")));
    env::remove_var(LIBRARY_DIR_ENV);

    let resolved = resolved.unwrap();
    assert_eq!(resolved.library_dir, PathBuf::from("/from/env"));
    assert_eq!(resolved.position_debounce_ms, 7);
    assert_eq!(with_cli.unwrap().library_dir, PathBuf::from("/from/cli"));
}
