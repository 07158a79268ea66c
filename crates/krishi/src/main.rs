// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Digital Krishi Officer - multi-agent agricultural support for farmers.
//!
//! This is the binary entry point for the `krishi` service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use krishi_agent::LexicalTranslator;
use krishi_config::KrishiConfig;

/// Placeholder printed in place of secrets.
const REDACTED: &str = "***";

/// Digital Krishi Officer - multi-agent agricultural support for farmers.
#[derive(Parser, Debug)]
#[command(name = "krishi", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server.
    Serve,
    /// Translate Malayalam text with the built-in vocabulary and print JSON.
    Translate {
        /// Text to translate.
        text: String,
    },
    /// Print the effective configuration as TOML (secrets redacted).
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config_file {
        Some(path) => krishi_config::load_and_validate_path(path),
        None => krishi_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            krishi_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Translate { text }) => {
            let result = LexicalTranslator::new().translate(&text);
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: failed to encode translation: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Config) => match redacted_toml(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("error: failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("krishi: use --help for available commands");
        }
    }
}

/// Render the configuration as TOML with the API key masked.
fn redacted_toml(config: &KrishiConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.model.api_key.is_some() {
        shown.model.api_key = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&shown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc can advance the stats epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn default_config_is_valid() {
        let config = krishi_config::load_and_validate_str("").expect("defaults should validate");
        assert_eq!(config.service.name, "Digital Krishi Officer API");
        assert_eq!(config.server.port, 8001);
    }

    #[test]
    fn config_output_masks_api_key() {
        let config = krishi_config::load_and_validate_str(
            "[model]\napi_key = \"sk-live-secret\"\n",
        )
        .unwrap();
        let rendered = redacted_toml(&config).unwrap();
        assert!(!rendered.contains("sk-live-secret"));
        assert!(rendered.contains(REDACTED));
        assert!(rendered.contains("[server]"));
    }

    #[test]
    fn config_output_without_key_has_no_placeholder() {
        let rendered = redacted_toml(&KrishiConfig::default()).unwrap();
        assert!(!rendered.contains(REDACTED));
        assert!(rendered.contains("gpt-4o-mini"));
    }

    #[test]
    fn cli_parses_translate_with_text() {
        let cli = Cli::try_parse_from(["krishi", "translate", "നെല്ല്"]).unwrap();
        match cli.command {
            Some(Commands::Translate { text }) => assert_eq!(text, "നെല്ല്"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_accepts_config_file_after_subcommand() {
        let cli = Cli::try_parse_from(["krishi", "serve", "--config-file", "/tmp/k.toml"]).unwrap();
        assert_eq!(cli.config_file, Some(PathBuf::from("/tmp/k.toml")));
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    #[test]
    fn cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
