//! The ingestion orchestrator.
//!
//! One invocation per entity kind: resolve the endpoint, open a sync run,
//! walk the paginated list, push every item through enrich -> normalize ->
//! upsert, and close the run with the final counters. A failing item is
//! recorded and skipped; only an error escaping the fetch itself aborts the
//! batch, finalizing the run as failed.

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::{error, info};

use congress_client::{detail, endpoint, fetch_paginated, RateLimiter, Transport};

use crate::config::ApiConfig;
use crate::error::Result;
use crate::models::{IngestStats, SyncStatus};
use crate::{normalize, store, sync_log};

/// Committee listings are per chamber; both feed one sync run.
const CHAMBERS: [&str; 2] = ["house", "senate"];

/// Filters for a bill ingestion run.
#[derive(Debug, Clone, Default)]
pub struct BillFilter {
    pub congress: Option<u16>,
    pub bill_type: Option<String>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub max_pages: Option<u32>,
}

impl BillFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_congress(mut self, congress: u16) -> Self {
        self.congress = Some(congress);
        self
    }

    pub fn with_bill_type(mut self, bill_type: impl Into<String>) -> Self {
        self.bill_type = Some(bill_type.into());
        self
    }

    pub fn with_date_range(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from_date = Some(from);
        self.to_date = Some(to);
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }
}

/// Drives bulk ingestion for all four entity kinds.
///
/// Single-threaded and sequential by design: one page drained before the
/// next, one record persisted at a time, every upsert committed on its own.
pub struct Ingestor<T: Transport> {
    transport: T,
    limiter: RateLimiter,
    pool: PgPool,
    page_size: u32,
}

impl<T: Transport> Ingestor<T> {
    pub fn new(transport: T, pool: PgPool) -> Self {
        Self {
            transport,
            limiter: RateLimiter::default(),
            pool,
            page_size: congress_client::page::DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_config(transport: T, pool: PgPool, config: &ApiConfig) -> Self {
        Self {
            transport,
            limiter: RateLimiter::new(config.rate_limit),
            pool,
            page_size: config.page_size,
        }
    }

    pub fn with_rate_limit(mut self, delay: std::time::Duration) -> Self {
        self.limiter = RateLimiter::new(delay);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Ingest bills matching the filter.
    pub async fn ingest_bills(&self, filter: &BillFilter) -> Result<IngestStats> {
        let from = filter.from_date.map(iso_utc);
        let to = filter.to_date.map(iso_utc);
        let endpoint = endpoint::bills(
            filter.congress,
            filter.bill_type.as_deref(),
            from.as_deref(),
            to.as_deref(),
        );
        let parameters = json!({
            "congress": filter.congress,
            "bill_type": filter.bill_type,
            "from_date": from,
            "to_date": to,
        });

        let run_id = sync_log::begin_sync(&self.pool, "bills", "bulk", Some(parameters)).await?;
        let mut stats = IngestStats::new();

        info!(%endpoint, "starting bill ingestion");
        let items = match fetch_paginated(
            &self.transport,
            &self.limiter,
            &endpoint,
            self.page_size,
            filter.max_pages,
        )
        .await
        {
            Ok(items) => items,
            Err(e) => return self.finish_failed(run_id, stats, &e.to_string()).await,
        };

        info!(count = items.len(), "processing bills");
        for item in items {
            match self.process_bill(item).await {
                Ok(created) => stats.record_upsert(created),
                Err(e) => {
                    error!(error = %e, "failed to process bill");
                    stats.record_failure(e.to_string());
                }
            }
        }

        sync_log::finish_sync(&self.pool, run_id, SyncStatus::Completed, &stats, None).await?;
        Ok(stats)
    }

    /// Ingest members, optionally scoped to one congress.
    pub async fn ingest_members(
        &self,
        congress: Option<u16>,
        max_pages: Option<u32>,
    ) -> Result<IngestStats> {
        let endpoint = endpoint::members(congress);
        let parameters = json!({ "congress": congress });

        let run_id = sync_log::begin_sync(&self.pool, "members", "bulk", Some(parameters)).await?;
        let mut stats = IngestStats::new();

        info!(%endpoint, "starting member ingestion");
        let items = match fetch_paginated(
            &self.transport,
            &self.limiter,
            &endpoint,
            self.page_size,
            max_pages,
        )
        .await
        {
            Ok(items) => items,
            Err(e) => return self.finish_failed(run_id, stats, &e.to_string()).await,
        };

        info!(count = items.len(), "processing members");
        for item in items {
            match self.process_member(item).await {
                Ok(created) => stats.record_upsert(created),
                Err(e) => {
                    error!(error = %e, "failed to process member");
                    stats.record_failure(e.to_string());
                }
            }
        }

        sync_log::finish_sync(&self.pool, run_id, SyncStatus::Completed, &stats, None).await?;
        Ok(stats)
    }

    /// Ingest amendments, optionally scoped to one congress.
    pub async fn ingest_amendments(
        &self,
        congress: Option<u16>,
        max_pages: Option<u32>,
    ) -> Result<IngestStats> {
        let endpoint = endpoint::amendments(congress);
        let parameters = json!({ "congress": congress });

        let run_id =
            sync_log::begin_sync(&self.pool, "amendments", "bulk", Some(parameters)).await?;
        let mut stats = IngestStats::new();

        info!(%endpoint, "starting amendment ingestion");
        let items = match fetch_paginated(
            &self.transport,
            &self.limiter,
            &endpoint,
            self.page_size,
            max_pages,
        )
        .await
        {
            Ok(items) => items,
            Err(e) => return self.finish_failed(run_id, stats, &e.to_string()).await,
        };

        info!(count = items.len(), "processing amendments");
        for item in items {
            match self.process_amendment(&item).await {
                Ok(created) => stats.record_upsert(created),
                Err(e) => {
                    error!(error = %e, "failed to process amendment");
                    stats.record_failure(e.to_string());
                }
            }
        }

        sync_log::finish_sync(&self.pool, run_id, SyncStatus::Completed, &stats, None).await?;
        Ok(stats)
    }

    /// Ingest committees for both chambers into one sync run.
    pub async fn ingest_committees(&self, max_pages: Option<u32>) -> Result<IngestStats> {
        let run_id = sync_log::begin_sync(&self.pool, "committees", "bulk", None).await?;
        let mut stats = IngestStats::new();

        for chamber in CHAMBERS {
            let endpoint = endpoint::committees(chamber);
            info!(%endpoint, "starting committee ingestion");

            let items = match fetch_paginated(
                &self.transport,
                &self.limiter,
                &endpoint,
                self.page_size,
                max_pages,
            )
            .await
            {
                Ok(items) => items,
                Err(e) => return self.finish_failed(run_id, stats, &e.to_string()).await,
            };

            info!(count = items.len(), chamber, "processing committees");
            for item in items {
                match self.process_committee(&item).await {
                    Ok(created) => stats.record_upsert(created),
                    Err(e) => {
                        error!(error = %e, "failed to process committee");
                        stats.record_failure(e.to_string());
                    }
                }
            }
        }

        sync_log::finish_sync(&self.pool, run_id, SyncStatus::Completed, &stats, None).await?;
        Ok(stats)
    }

    /// Ingest bills updated within the last `days` days.
    pub async fn sync_recent_bills(&self, days: u32) -> Result<IngestStats> {
        let to = Utc::now();
        let from = to - Duration::days(i64::from(days));

        info!(from = %iso_utc(from), to = %iso_utc(to), "syncing recent bills");
        let filter = BillFilter::new().with_date_range(from, to);
        self.ingest_bills(&filter).await
    }

    /// A list bill without a title gets completed through its detail link.
    async fn process_bill(&self, item: Value) -> Result<bool> {
        let item = detail::enrich(&self.transport, &self.limiter, item, "title", "bill").await?;
        let record = normalize::bill(&item)?;
        let outcome = store::upsert_bill(&self.pool, &record).await?;
        Ok(outcome.created)
    }

    /// Member list projections omit name parts and birth year; always
    /// complete them through the detail endpoint.
    async fn process_member(&self, item: Value) -> Result<bool> {
        let item =
            detail::enrich(&self.transport, &self.limiter, item, "firstName", "member").await?;
        let record = normalize::member(&item)?;
        let outcome = store::upsert_member(&self.pool, &record).await?;
        Ok(outcome.created)
    }

    async fn process_amendment(&self, item: &Value) -> Result<bool> {
        let record = normalize::amendment(item)?;
        let outcome = store::upsert_amendment(&self.pool, &record).await?;
        Ok(outcome.created)
    }

    async fn process_committee(&self, item: &Value) -> Result<bool> {
        let record = normalize::committee(item)?;
        let outcome = store::upsert_committee(&self.pool, &record).await?;
        Ok(outcome.created)
    }

    /// Fatal path: finalize the run as failed and hand back whatever stats
    /// were accumulated before the failure.
    async fn finish_failed(
        &self,
        run_id: i64,
        stats: IngestStats,
        message: &str,
    ) -> Result<IngestStats> {
        error!(run_id, message, "fatal error during ingestion");
        sync_log::finish_sync(&self.pool, run_id, SyncStatus::Failed, &stats, Some(message))
            .await?;
        Ok(stats)
    }
}

fn iso_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
