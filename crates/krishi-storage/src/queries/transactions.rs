// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Farmer query transaction records.
//!
//! Finalizing updates are guarded by `status = 'processing'`, so a record
//! leaves the processing state exactly once.

use krishi_core::KrishiError;
use krishi_core::types::{AgentResponses, QueryOutcome, QueryStatus, TransactionRecord};
use rusqlite::{OptionalExtension, params, types::Type};

use crate::database::{Database, map_tr_err};

/// Result of a guarded finalize update.
enum Finalize {
    Updated,
    Missing,
    AlreadyFinal(String),
}

/// Insert a freshly submitted record.
pub async fn insert_query(db: &Database, record: &TransactionRecord) -> Result<(), KrishiError> {
    let record = record.clone();
    let agent_responses = to_json_column(record.agent_responses.as_ref())?;
    let recommendations = to_json_column(record.recommendations.as_ref())?;

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO queries (id, original_text, query_type, location, farmer_id,
                                      created_at, status, translated_text, intent, confidence,
                                      agent_responses, recommendations, error)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    record.id,
                    record.original_text,
                    record.query_type,
                    record.location,
                    record.farmer_id,
                    record.created_at,
                    record.status.to_string(),
                    record.translated_text,
                    record.intent,
                    record.confidence,
                    agent_responses,
                    recommendations,
                    record.error,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Finalize a processing record as `completed`.
pub async fn complete_query(
    db: &Database,
    id: &str,
    outcome: &QueryOutcome,
) -> Result<(), KrishiError> {
    let id_owned = id.to_string();
    let translated_text = outcome.translated_text.clone();
    let intent = outcome.intent.clone();
    let confidence = outcome.confidence;
    let agent_responses = to_json_column(Some(&outcome.agent_responses))?;
    let recommendations = to_json_column(Some(&outcome.recommendations))?;

    let result = db
        .connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE queries
                 SET status = 'completed', translated_text = ?2, intent = ?3, confidence = ?4,
                     agent_responses = ?5, recommendations = ?6
                 WHERE id = ?1 AND status = 'processing'",
                params![
                    id_owned,
                    translated_text,
                    intent,
                    confidence,
                    agent_responses,
                    recommendations
                ],
            )?;
            finalize_result(conn, &id_owned, changed)
        })
        .await
        .map_err(map_tr_err)?;

    check_finalize(id, result)
}

/// Finalize a processing record as `error`.
pub async fn fail_query(db: &Database, id: &str, error: &str) -> Result<(), KrishiError> {
    let id_owned = id.to_string();
    let error = error.to_string();

    let result = db
        .connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE queries SET status = 'error', error = ?2
                 WHERE id = ?1 AND status = 'processing'",
                params![id_owned, error],
            )?;
            finalize_result(conn, &id_owned, changed)
        })
        .await
        .map_err(map_tr_err)?;

    check_finalize(id, result)
}

/// Get a record by id.
pub async fn get_query(db: &Database, id: &str) -> Result<Option<TransactionRecord>, KrishiError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, original_text, query_type, location, farmer_id, created_at, status,
                        translated_text, intent, confidence, agent_responses, recommendations, error
                 FROM queries WHERE id = ?1",
                params![id],
                |row| {
                    let status: String = row.get(6)?;
                    let status = status.parse::<QueryStatus>().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e))
                    })?;
                    Ok(TransactionRecord {
                        id: row.get(0)?,
                        original_text: row.get(1)?,
                        query_type: row.get(2)?,
                        location: row.get(3)?,
                        farmer_id: row.get(4)?,
                        created_at: row.get(5)?,
                        status,
                        translated_text: row.get(7)?,
                        intent: row.get(8)?,
                        confidence: row.get(9)?,
                        agent_responses: from_json_column::<AgentResponses>(row, 10)?,
                        recommendations: from_json_column::<Vec<String>>(row, 11)?,
                        error: row.get(12)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

fn finalize_result(
    conn: &rusqlite::Connection,
    id: &str,
    changed: usize,
) -> Result<Finalize, rusqlite::Error> {
    if changed > 0 {
        return Ok(Finalize::Updated);
    }
    let status: Option<String> = conn
        .query_row(
            "SELECT status FROM queries WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(match status {
        Some(status) => Finalize::AlreadyFinal(status),
        None => Finalize::Missing,
    })
}

fn check_finalize(id: &str, result: Finalize) -> Result<(), KrishiError> {
    match result {
        Finalize::Updated => Ok(()),
        Finalize::Missing => Err(KrishiError::NotFound {
            entity: "query",
            id: id.to_string(),
        }),
        Finalize::AlreadyFinal(status) => Err(KrishiError::Conflict(format!(
            "query {id} is already {status}"
        ))),
    }
}

fn to_json_column<T: serde::Serialize>(value: Option<&T>) -> Result<Option<String>, KrishiError> {
    value
        .map(serde_json::to_string)
        .transpose()
        .map_err(KrishiError::storage)
}

fn from_json_column<T: serde::de::DeserializeOwned>(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> Result<Option<T>, rusqlite::Error> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| serde_json::from_str(&t))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
