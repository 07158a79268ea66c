// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Krishi Officer service.
//!
//! This crate provides the trait definitions, error type, and domain types
//! used throughout the workspace. Model providers and transaction stores
//! implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::KrishiError;
pub use types::{AdapterType, HealthStatus, QueryStatus};

pub use traits::{ModelProvider, PluginAdapter, TransactionStore};
