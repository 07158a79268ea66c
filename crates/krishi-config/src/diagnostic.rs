// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with "did you mean?" suggestions.
//!
//! Turns figment extraction errors into miette diagnostics pointing at the
//! offending key in the TOML source, with Jaro-Winkler typo suggestions.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a key to be offered as a correction.
/// Catches `prot` -> `port` and `base_ulr` -> `base_url` without suggesting noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(krishi::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Closest valid key, if any is close enough.
        suggestion: Option<String>,
        /// Comma-separated valid keys for the section.
        valid_keys: String,
        /// Location of the key in the source file.
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        /// The source file, for context display.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(krishi::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path of the key.
        key: String,
        /// Description of the mismatch.
        detail: String,
        /// What type was expected.
        expected: String,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(krishi::config::missing_key),
        help("add `{key} = <value>` to your krishi.toml")
    )]
    MissingKey {
        /// The missing key name.
        key: String,
    },

    /// A semantic validation failure.
    #[error("validation error: {message}")]
    #[diagnostic(code(krishi::config::validation))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(krishi::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
///
/// `toml_sources` holds `(path, content)` pairs used to attach source spans.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let valid: Vec<&str> = expected.to_vec();
                    let (span, src) = locate_key(&error, &section, field, toml_sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion: suggest_key(field, &valid),
                        valid_keys: valid.join(", "),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: field.to_string(),
                },
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: section.join("."),
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Attach a source span when the error came from one of the known TOML files.
fn locate_key(
    error: &figment::error::Error,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let origin = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let Some((path, content)) = origin
        .as_deref()
        .and_then(|origin| toml_sources.iter().find(|(p, _)| p == origin))
    else {
        return (None, None);
    };

    match find_key_offset(content, section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.clone())),
        ),
        None => (None, None),
    }
}

/// Find the byte offset of `field` inside the `[section]` table of a TOML document.
///
/// Top-level fields (empty `section`) are searched from the start.
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let start = match section.first() {
        Some(name) => {
            let header = format!("[{name}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') && section.first().is_some() && offset != start {
            // Next table header: the key is not in this section.
            return None;
        }
        if let Some(rest) = trimmed.strip_prefix(field)
            && rest.trim_start().starts_with('=')
        {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }
    None
}

/// Suggest the closest valid key using Jaro-Winkler similarity.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_port_for_prot() {
        assert_eq!(suggest_key("prot", &["host", "port"]), Some("port".into()));
    }

    #[test]
    fn suggests_base_url_for_transposed_letters() {
        let valid = &["base_url", "api_key", "model", "max_tokens"];
        assert_eq!(suggest_key("base_ulr", valid), Some("base_url".into()));
    }

    #[test]
    fn no_suggestion_for_unrelated_key() {
        assert_eq!(suggest_key("zzzzzz", &["name", "log_level"]), None);
    }

    #[test]
    fn finds_key_inside_its_section() {
        let content = "[server]\nhost = \"0.0.0.0\"\n\n[model]\nmodle = \"x\"\n";
        let offset = find_key_offset(content, &["model".to_string()], "modle").unwrap();
        assert_eq!(&content[offset..offset + 5], "modle");
    }

    #[test]
    fn does_not_match_key_from_a_later_section() {
        let content = "[server]\nport = 1\n\n[model]\nmodle = \"x\"\n";
        assert_eq!(find_key_offset(content, &["server".to_string()], "modle"), None);
    }

    #[test]
    fn key_prefix_does_not_count_as_match() {
        let content = "[model]\nmodel_name = \"x\"\nmodel = \"y\"\n";
        let offset = find_key_offset(content, &["model".to_string()], "model").unwrap();
        assert!(content[offset..].starts_with("model = "));
    }
}
