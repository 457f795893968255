//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! building a working context from it.

use std::io::Write;

use beautywiki_domain::{Config, StorageBackend, WikiError};
use beautywiki_infra::{config, WikiContext};
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "api": {
                "base_url": "https://staging.wiki.example.com",
                "timeout_seconds": 15
            },
            "storage": {"backend": "memory"},
            "external": {
                "face_plus_plus_api_key": "key",
                "face_plus_plus_api_secret": "secret",
                "voice_base_url": "https://knn.example.com"
            },
            "logging": {"filter": "beautywiki_infra=debug", "json": true}
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config from JSON file");

    assert_eq!(config.api.base_url, "https://staging.wiki.example.com");
    assert_eq!(config.api.timeout_seconds, 15);
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.external.voice_base_url.as_deref(), Some("https://knn.example.com"));
    assert_eq!(config.external.imgur_base_url, Config::default().external.imgur_base_url);
    assert_eq!(config.logging.filter, "beautywiki_infra=debug");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let path = write_config(
        r#"
[api]
base_url = "http://localhost:8080"
user_agent = "BeautyWiki-Integration"

[storage]
backend = "memory"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config from TOML file");

    assert_eq!(config.api.user_agent, "BeautyWiki-Integration");
    assert_eq!(config.api.timeout_seconds, Config::default().api.timeout_seconds);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_invalid_toml_is_config_error() {
    let path = write_config("[api\nbase_url = ", "toml");

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(WikiError::Config(ref m)) if m.contains("TOML")));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_loaded_config_builds_context() {
    let path = write_config(
        r#"{"api": {"base_url": "http://localhost:8080"}, "storage": {"backend": "memory"}}"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config from JSON file");
    let context = WikiContext::new(config).expect("context from loaded config");
    assert_eq!(context.client.base_url().as_str(), "http://localhost:8080/");

    std::fs::remove_file(path).ok();
}
