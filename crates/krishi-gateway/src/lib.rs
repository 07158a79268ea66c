// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Krishi Officer service.
//!
//! Routes:
//! - `GET /` service banner
//! - `GET /api/health` liveness
//! - `POST /api/farmer-query` run a query through the pipeline
//! - `POST /api/translate` direct lexical translation
//! - `GET /api/queries/{id}` fetch a stored transaction record

pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, build_router, start_server};
