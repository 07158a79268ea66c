// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL files under `migrations/` are compiled into the binary and applied
//! automatically when a [`Database`](crate::Database) is opened.

use krishi_core::KrishiError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Refinery tracks applied versions in `refinery_schema_history`, so this is
/// safe to call on every open.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), KrishiError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(KrishiError::storage)?;
    for migration in report.applied_migrations() {
        tracing::debug!(version = migration.version(), name = migration.name(), "migration applied");
    }
    Ok(())
}
