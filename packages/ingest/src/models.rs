//! Canonical records, sync-run audit rows, and per-run statistics.
//!
//! Each canonical record pairs an immutable natural key with the mutable
//! descriptive fields a later ingestion may overwrite. Nested collections
//! stay as JSON blobs; bills and amendments also carry the verbatim raw
//! payload for audit and reprocessing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound on per-item error messages kept in [`IngestStats`].
pub const MAX_RECORDED_ERRORS: usize = 50;

/// Status of one ingestion invocation in the sync log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sync_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Running,
    Completed,
    Failed,
}

/// One row of the append-only sync log.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SyncRun {
    pub id: i64,
    pub endpoint: String,
    pub sync_type: String,
    pub parameters: Option<Value>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: SyncStatus,
    pub records_processed: i32,
    pub records_created: i32,
    pub records_updated: i32,
    pub records_failed: i32,
    pub error_message: Option<String>,
}

/// Outcome of one upsert: the row id and whether the row was newly created.
///
/// `created` is computed inside the upsert statement itself, never inferred
/// from the id.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct Upsert {
    pub id: i64,
    pub created: bool,
}

/// Ephemeral per-invocation counters. A fresh value per orchestrator run,
/// returned to the caller and written into the sync log at finalization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestStats {
    pub processed: i32,
    pub created: i32,
    pub updated: i32,
    pub failed: i32,
    pub errors: Vec<String>,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one successfully persisted item.
    pub fn record_upsert(&mut self, created: bool) {
        self.processed += 1;
        if created {
            self.created += 1;
        } else {
            self.updated += 1;
        }
    }

    /// Count one isolated per-item failure; the message list is bounded.
    pub fn record_failure(&mut self, message: String) {
        self.processed += 1;
        self.failed += 1;
        if self.errors.len() < MAX_RECORDED_ERRORS {
            self.errors.push(message);
        }
    }
}

/// Canonical bill, keyed by (congress, bill_type, bill_number).
#[derive(Debug, Clone)]
pub struct BillRecord {
    pub congress: i32,
    pub bill_type: String,
    pub bill_number: i32,
    pub title: Option<String>,
    pub origin_chamber: Option<String>,
    pub origin_chamber_code: Option<String>,
    pub update_date: Option<String>,
    pub update_date_including_text: Option<String>,
    pub introduced_date: Option<String>,
    pub constitution_authority_statement_text: Option<String>,
    pub policy_area: Option<Value>,
    pub subjects: Option<Value>,
    pub latest_action: Option<Value>,
    pub sponsors: Value,
    pub cosponsors_count: i32,
    pub committees: Value,
    pub related_bills: Value,
    pub actions: Value,
    pub summaries: Value,
    pub amendments: Value,
    pub texts: Value,
    pub titles: Value,
    pub law_number: Option<String>,
    pub law_type: Option<String>,
    pub is_law: bool,
    pub raw: Value,
}

/// Canonical member, keyed by the stable bioguide identifier.
#[derive(Debug, Clone)]
pub struct MemberRecord {
    pub bioguide_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub suffix: Option<String>,
    pub nickname: Option<String>,
    pub party: Option<String>,
    pub state: Option<String>,
    pub district: Option<i32>,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
    pub terms: Value,
}

/// Canonical amendment, keyed by (congress, amendment_type, amendment_number).
/// The amended bill is an embedded identifier snapshot, not a foreign key.
#[derive(Debug, Clone)]
pub struct AmendmentRecord {
    pub congress: i32,
    pub amendment_type: String,
    pub amendment_number: i32,
    pub bill_congress: Option<i32>,
    pub bill_type: Option<String>,
    pub bill_number: Option<i32>,
    pub purpose: Option<String>,
    pub description: Option<String>,
    pub chamber: Option<String>,
    pub amendment_to_amendment: Option<Value>,
    pub sponsors: Value,
    pub cosponsors: Value,
    pub proposed_date: Option<String>,
    pub submitted_date: Option<String>,
    pub latest_action: Option<Value>,
    pub actions: Value,
    pub raw: Value,
}

/// Canonical committee, keyed by the system code.
#[derive(Debug, Clone)]
pub struct CommitteeRecord {
    pub system_code: String,
    pub name: Option<String>,
    pub chamber: Option<String>,
    pub committee_type: Option<String>,
    pub subcommittees: Value,
    pub parent_system_code: Option<String>,
}
