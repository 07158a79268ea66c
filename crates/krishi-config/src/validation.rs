// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths, well-formed URLs, and positive limits.

use crate::diagnostic::ConfigError;
use crate::model::KrishiConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &KrishiConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let base_url = config.model.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "model.base_url must start with http:// or https://, got `{base_url}`"
        ));
    }

    if config.model.model.trim().is_empty() {
        fail("model.model must not be empty".to_string());
    }

    if config.model.max_tokens == 0 {
        fail("model.max_tokens must be at least 1".to_string());
    }

    if config.model.request_timeout_secs == 0 {
        fail("model.request_timeout_secs must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
