// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system.

use krishi_config::diagnostic::ConfigError;
use krishi_config::model::KrishiConfig;
use krishi_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_krishi_config() {
    let toml = r#"
[service]
name = "Krishi Test"
log_level = "debug"

[server]
host = "0.0.0.0"
port = 9100

[model]
base_url = "http://localhost:11434/v1"
api_key = "sk-test"
model = "llama3"
max_tokens = 512
request_timeout_secs = 10

[storage]
database_path = "/tmp/krishi-test.db"
wal_mode = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "Krishi Test");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.model.base_url, "http://localhost:11434/v1");
    assert_eq!(config.model.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.model.model, "llama3");
    assert_eq!(config.model.max_tokens, 512);
    assert_eq!(config.model.request_timeout().as_secs(), 10);
    assert_eq!(config.storage.database_path, "/tmp/krishi-test.db");
    assert!(!config.storage.wal_mode);
}

/// Missing sections use defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.service.name, "Digital Krishi Officer API");
    assert_eq!(config.service.log_level, "info");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8001);
    assert_eq!(config.model.base_url, "https://api.openai.com/v1");
    assert!(config.model.api_key.is_none());
    assert_eq!(config.model.model, "gpt-4o-mini");
    assert_eq!(config.model.request_timeout_secs, 30);
    assert!(config.storage.database_path.ends_with("krishi.db"));
    assert!(config.storage.wal_mode);
}

/// Unknown field produces an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_field_produces_suggestion() {
    let toml = r#"
[server]
prot = 8080
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "prot");
            assert_eq!(suggestion.as_deref(), Some("port"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let err = load_config_from_str("[telegram]\nbot_token = \"x\"\n")
        .expect_err("should reject unknown section");
    assert!(err.to_string().contains("telegram"), "got: {err}");
}

/// Wrong value type produces an InvalidType diagnostic.
#[test]
fn wrong_type_produces_invalid_type() {
    let errors = load_and_validate_str("[server]\nport = \"eighty\"\n")
        .expect_err("should reject string port");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_errors_surface_through_load_and_validate() {
    let errors = load_and_validate_str("[model]\nmax_tokens = 0\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

/// Config round-trips through TOML serialization.
#[test]
fn config_serializes_back_to_toml() {
    let config = KrishiConfig::default();
    let text = toml::to_string_pretty(&config).unwrap();
    assert!(text.contains("[model]"));
    let reparsed = load_config_from_str(&text).unwrap();
    assert_eq!(reparsed.server.port, config.server.port);
}
