//! Congress.gov bulk ingestion.
//!
//! Ingests bills, members, amendments, and committees from the paginated
//! Congress.gov API and persists them idempotently into Postgres, with one
//! audit row per ingestion run.
//!
//! # Architecture
//!
//! - [`models`]: canonical records, sync-run rows, per-run statistics
//! - [`normalize`]: raw payload -> canonical record, one mapper per kind
//! - [`store`]: natural-key upserts with a created/updated outcome
//! - [`sync_log`]: append-only audit of ingestion runs
//! - [`ingest`]: the orchestrator tying fetch, enrich, normalize, upsert
//! - [`config`] / [`db`] / [`error`]: environment config, pool, error types
//! - [`cli`]: command-line interface

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;
pub mod normalize;
pub mod store;
pub mod sync_log;

pub use config::{ApiConfig, IngestConfig};
pub use db::{create_pool, run_migrations};
pub use error::{IngestError, Result};
pub use ingest::{BillFilter, Ingestor};
pub use models::{IngestStats, SyncRun, SyncStatus, Upsert};
