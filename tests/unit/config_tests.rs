// ==========================
// tests/unit/config_tests.rs
// ==========================
//! Unit tests for the configuration module
use identity_core::{LogFormat, Settings};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_settings_default() {
    let settings = Settings::default();

    assert_eq!(settings.email_domain, "capita.co.uk");
    assert_eq!(settings.data_dir, PathBuf::from("data"));
    assert_eq!(settings.log_level, "info");
    assert_eq!(settings.log_format, LogFormat::Pretty);
}

#[test]
fn test_settings_from_json_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("identity.json");
    fs::write(
        &config_path,
        r#"{ "email_domain": "example.org", "log_level": "warn" }"#,
    )
    .unwrap();

    let settings = Settings::load_from(&config_path).unwrap();
    assert_eq!(settings.email_domain, "example.org");
    assert_eq!(settings.log_level, "warn");
    assert_eq!(settings.data_dir, PathBuf::from("data"));
}

#[test]
fn test_unknown_log_format_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("identity.toml");
    fs::write(&config_path, r#"log_format = "xml""#).unwrap();

    assert!(Settings::load_from(&config_path).is_err());
}

#[test]
fn test_validate_rejects_address_as_domain() {
    let settings = Settings {
        email_domain: "admin@capita.co.uk".to_string(),
        ..Settings::default()
    };
    let err = settings.validate().unwrap_err();
    assert_eq!(err.error_code(), "CFG_001");
}
