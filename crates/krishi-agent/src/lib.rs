// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agents and the query pipeline for the Krishi Officer service.
//!
//! - [`LexicalTranslator`] rewrites Malayalam agricultural terms into English
//! - [`IntentClassifier`] asks the model for a structured intent analysis
//! - [`AgricultureAdvisor`] asks the model for practical advice
//! - [`Orchestrator`] runs the three in order and persists the transaction

pub mod advisor;
pub mod classifier;
pub mod orchestrator;
pub mod translator;

pub use advisor::AgricultureAdvisor;
pub use classifier::IntentClassifier;
pub use orchestrator::Orchestrator;
pub use translator::LexicalTranslator;
