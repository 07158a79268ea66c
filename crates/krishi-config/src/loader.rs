// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./krishi.toml` > `~/.config/krishi/krishi.toml` > `/etc/krishi/krishi.toml`
//! with environment variable overrides via `KRISHI_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::KrishiConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/krishi/krishi.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "krishi.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/krishi/krishi.toml` (system-wide)
/// 3. `~/.config/krishi/krishi.toml` (user XDG config)
/// 4. `./krishi.toml` (local directory)
/// 5. `KRISHI_*` environment variables
pub fn load_config() -> Result<KrishiConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<KrishiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KrishiConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KrishiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KrishiConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(KrishiConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Path of the per-user config file, if a config dir exists.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("krishi").join(LOCAL_CONFIG_FILE))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")`: `KRISHI_MODEL_REQUEST_TIMEOUT_SECS`
/// must map to `model.request_timeout_secs`, not `model.request.timeout.secs`.
fn env_provider() -> Env {
    Env::prefixed("KRISHI_").map(|key| {
        let key_str = key.as_str();
        let mapped = ["service", "server", "model", "storage"]
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.to_string());
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_nested_keys_with_underscores() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("KRISHI_MODEL_REQUEST_TIMEOUT_SECS", "7");
            jail.set_env("KRISHI_SERVICE_LOG_LEVEL", "debug");
            jail.set_env("KRISHI_SERVER_PORT", "9000");

            let config: KrishiConfig = Figment::new()
                .merge(Serialized::defaults(KrishiConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.model.request_timeout_secs, 7);
            assert_eq!(config.service.log_level, "debug");
            assert_eq!(config.server.port, 9000);
            Ok(())
        });
    }

    #[test]
    fn local_file_is_picked_up() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(LOCAL_CONFIG_FILE, "[model]\nmodel = \"local-model\"\n")?;
            let config = load_config()?;
            assert_eq!(config.model.model, "local-model");
            Ok(())
        });
    }

    #[test]
    fn env_beats_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[storage]\ndatabase_path = \"/from/file.db\"\n")?;
            jail.set_env("KRISHI_STORAGE_DATABASE_PATH", "/from/env.db");
            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.storage.database_path, "/from/env.db");
            Ok(())
        });
    }
}
