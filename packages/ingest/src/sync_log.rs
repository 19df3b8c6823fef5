//! Append-only audit trail of ingestion invocations.
//!
//! Exactly one begin/finish pair brackets each orchestrator run. Rows are
//! never deleted; a row left at `running` marks a crashed run and is an
//! operational concern, not something this module recovers.

use serde_json::Value;
use sqlx::PgPool;

use crate::error::{IngestError, Result};
use crate::models::{IngestStats, SyncRun, SyncStatus};

/// Open a sync run with status `running`; returns the run id.
#[tracing::instrument(skip(pool, parameters), fields(endpoint, sync_type))]
pub async fn begin_sync(
    pool: &PgPool,
    endpoint: &str,
    sync_type: &str,
    parameters: Option<Value>,
) -> Result<i64> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO sync_log (endpoint, sync_type, parameters, status)
        VALUES ($1, $2, $3, 'running')
        RETURNING id
        "#,
    )
    .bind(endpoint)
    .bind(sync_type)
    .bind(parameters)
    .fetch_one(pool)
    .await?;

    tracing::info!(run_id = id, endpoint, "sync run started");
    Ok(id)
}

/// Close a sync run: final status, completion timestamp, counters, and the
/// error message when the run failed.
#[tracing::instrument(skip(pool, stats, error_message), fields(run_id = id, status = ?status))]
pub async fn finish_sync(
    pool: &PgPool,
    id: i64,
    status: SyncStatus,
    stats: &IngestStats,
    error_message: Option<&str>,
) -> Result<SyncRun> {
    let run = sqlx::query_as::<_, SyncRun>(
        r#"
        UPDATE sync_log
        SET status = $2,
            completed_at = now(),
            records_processed = $3,
            records_created = $4,
            records_updated = $5,
            records_failed = $6,
            error_message = $7
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(stats.processed)
    .bind(stats.created)
    .bind(stats.updated)
    .bind(stats.failed)
    .bind(error_message)
    .fetch_optional(pool)
    .await?
    .ok_or(IngestError::SyncRunNotFound(id))?;

    match run.status {
        SyncStatus::Failed => {
            tracing::warn!(run_id = id, error = ?run.error_message, "sync run failed");
        }
        _ => {
            tracing::info!(
                run_id = id,
                processed = run.records_processed,
                created = run.records_created,
                updated = run.records_updated,
                failed = run.records_failed,
                "sync run finished"
            );
        }
    }
    Ok(run)
}

/// Get a sync run by id.
pub async fn get_sync_run(pool: &PgPool, id: i64) -> Result<SyncRun> {
    let run = sqlx::query_as::<_, SyncRun>(r#"SELECT * FROM sync_log WHERE id = $1"#)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(IngestError::SyncRunNotFound(id))?;

    Ok(run)
}

/// List the most recent sync runs, newest first.
pub async fn list_sync_runs(pool: &PgPool, limit: i64) -> Result<Vec<SyncRun>> {
    let runs = sqlx::query_as::<_, SyncRun>(
        r#"SELECT * FROM sync_log ORDER BY started_at DESC, id DESC LIMIT $1"#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(runs)
}
