// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical Malayalam-to-English translation.
//!
//! Replaces known agricultural terms from a closed vocabulary. Entries are
//! applied in table order, so a later entry may rewrite text produced by an
//! earlier one. Input with no known term is wrapped in a fixed template.

use krishi_core::KrishiError;
use krishi_core::types::TranslationResult;

/// Display name of the translation agent.
pub const AGENT_NAME: &str = "Translation Agent";

/// Method label reported on successful translations.
pub const METHOD: &str = "keyword_based";

/// Prefix of the template used when no vocabulary term matched.
pub const FALLBACK_PREFIX: &str = "Agricultural query: ";

/// Language pair the vocabulary covers.
pub const SOURCE_LANG: &str = "ml";
pub const TARGET_LANG: &str = "en";

/// Built-in Malayalam to English term pairs, in application order.
pub const VOCABULARY: &[(&str, &str)] = &[
    ("നെല്ല്", "rice"),
    ("കപ്പ", "tapioca"),
    ("തെങ്ങ്", "coconut"),
    ("കുരുമുളക്", "pepper"),
    ("ഏലം", "cardamom"),
    ("റബ്ബർ", "rubber"),
    ("പയർ", "beans"),
    ("വിത്ത്", "seed"),
    ("നടുക", "plant"),
    ("കൊയ്ത്ത്", "harvest"),
    ("വളം", "fertilizer"),
    ("രോഗം", "disease"),
    ("കീടം", "pest"),
    ("പുഴു", "worm"),
    ("മഴ", "rain"),
    ("വരൾച്ച", "drought"),
    ("എന്താണ്", "what is"),
    ("എങ്ങനെ", "how"),
    ("എപ്പോൾ", "when"),
    ("എവിടെ", "where"),
    ("സഹായം", "help"),
    ("ചികിത്സ", "treatment"),
    ("മരുന്ന്", "medicine"),
];

/// Closed-vocabulary substitution translator.
#[derive(Debug, Clone)]
pub struct LexicalTranslator {
    vocabulary: Vec<(String, String)>,
}

impl LexicalTranslator {
    /// Translator over the built-in vocabulary.
    pub fn new() -> Self {
        Self::with_vocabulary(
            VOCABULARY
                .iter()
                .map(|(ml, en)| (ml.to_string(), en.to_string()))
                .collect(),
        )
    }

    /// Translator over a caller-supplied vocabulary.
    pub fn with_vocabulary(vocabulary: Vec<(String, String)>) -> Self {
        Self { vocabulary }
    }

    /// Translate `text`. Never fails outright: faults are reported in the result.
    pub fn translate(&self, text: &str) -> TranslationResult {
        match self.substitute(text) {
            Ok(Some(translated)) => TranslationResult::translated(text, translated, METHOD),
            Ok(None) => {
                TranslationResult::templated(text, format!("{FALLBACK_PREFIX}{text}"), METHOD)
            }
            Err(e) => {
                tracing::error!(error = %e, "translation error");
                TranslationResult::failed(text, e.to_string())
            }
        }
    }

    /// Applies the vocabulary. `None` means no term matched.
    fn substitute(&self, text: &str) -> Result<Option<String>, KrishiError> {
        let mut translated = text.to_string();
        for (source, target) in &self.vocabulary {
            if source.is_empty() {
                return Err(KrishiError::Translation(format!(
                    "vocabulary entry for `{target}` has an empty source term"
                )));
            }
            if translated.contains(source.as_str()) {
                translated = translated.replace(source.as_str(), target);
            }
        }

        if translated == text {
            return Ok(None);
        }
        Ok(Some(translated))
    }
}

impl Default for LexicalTranslator {
    fn default() -> Self {
        Self::new()
    }
}
