// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Krishi Officer integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic tests without a live model endpoint.
//!
//! # Components
//!
//! - [`MockProvider`] - Scripted model provider that records requests
//! - [`MockStore`] - In-memory transaction store with fault injection
//! - [`TestHarness`] - Full pipeline over a temp SQLite database

pub mod harness;
pub mod mock_provider;
pub mod mock_store;

pub use harness::TestHarness;
pub use mock_provider::MockProvider;
pub use mock_store::MockStore;
