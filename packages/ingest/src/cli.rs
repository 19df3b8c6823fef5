//! Command-line interface for the ingestion pipeline.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use console::style;

use congress_client::CongressClient;

use crate::config::{ApiConfig, IngestConfig};
use crate::error::{IngestError, Result};
use crate::ingest::{BillFilter, Ingestor};
use crate::models::{IngestStats, SyncStatus};
use crate::{db, sync_log};

/// Congress.gov bulk ingestion - pull legislative data into Postgres.
#[derive(Parser)]
#[command(name = "congress-ingest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest bills, optionally filtered by congress, type, and date range.
    Bills {
        /// Congress number (e.g., 118)
        #[arg(long)]
        congress: Option<u16>,

        /// Bill type (hr, s, hjres, sjres, ...)
        #[arg(long)]
        bill_type: Option<String>,

        /// Start of the update-date window, YYYY-MM-DD
        #[arg(long)]
        from_date: Option<String>,

        /// End of the update-date window, YYYY-MM-DD
        #[arg(long)]
        to_date: Option<String>,

        /// Maximum pages to fetch
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Ingest members, optionally scoped to one congress.
    Members {
        #[arg(long)]
        congress: Option<u16>,

        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Ingest amendments, optionally scoped to one congress.
    Amendments {
        #[arg(long)]
        congress: Option<u16>,

        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Ingest House and Senate committees.
    Committees {
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Ingest bills updated within the last N days.
    SyncRecent {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },

    /// Apply database migrations and exit.
    Migrate,

    /// Show recent sync runs from the audit log.
    History {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

/// Run the CLI.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let db_config = IngestConfig::from_env()?;
    let pool = db::create_pool(&db_config).await?;
    db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Bills {
            congress,
            bill_type,
            from_date,
            to_date,
            max_pages,
        } => {
            let mut filter = BillFilter {
                congress,
                bill_type,
                from_date: from_date.as_deref().map(parse_date).transpose()?,
                to_date: to_date.as_deref().map(parse_date).transpose()?,
                max_pages,
            };
            // Close an open-ended window at now
            if filter.from_date.is_some() && filter.to_date.is_none() {
                filter.to_date = Some(Utc::now());
            }

            let stats = ingestor(pool)?.ingest_bills(&filter).await?;
            print_stats("bills", &stats);
        }
        Commands::Members { congress, max_pages } => {
            let stats = ingestor(pool)?.ingest_members(congress, max_pages).await?;
            print_stats("members", &stats);
        }
        Commands::Amendments { congress, max_pages } => {
            let stats = ingestor(pool)?
                .ingest_amendments(congress, max_pages)
                .await?;
            print_stats("amendments", &stats);
        }
        Commands::Committees { max_pages } => {
            let stats = ingestor(pool)?.ingest_committees(max_pages).await?;
            print_stats("committees", &stats);
        }
        Commands::SyncRecent { days } => {
            let stats = ingestor(pool)?.sync_recent_bills(days).await?;
            print_stats("recent bills", &stats);
        }
        Commands::Migrate => {
            println!("{}", style("Migrations applied").green());
        }
        Commands::History { limit } => {
            let runs = sync_log::list_sync_runs(&pool, limit).await?;
            for run in runs {
                let status = match run.status {
                    SyncStatus::Completed => style("completed").green(),
                    SyncStatus::Failed => style("failed").red(),
                    SyncStatus::Running => style("running").yellow(),
                };
                println!(
                    "#{:<5} {:<12} {:<10} started {}  processed={} created={} updated={} failed={}",
                    run.id,
                    run.endpoint,
                    status,
                    run.started_at.format("%Y-%m-%d %H:%M:%S"),
                    run.records_processed,
                    run.records_created,
                    run.records_updated,
                    run.records_failed,
                );
                if let Some(message) = run.error_message {
                    println!("       {}", style(message).red());
                }
            }
        }
    }

    Ok(())
}

fn ingestor(pool: sqlx::PgPool) -> Result<Ingestor<CongressClient>> {
    let api_config = ApiConfig::from_env()?;
    let transport = CongressClient::with_base_url(&api_config.api_key, &api_config.base_url)?;
    Ok(Ingestor::with_config(transport, pool, &api_config))
}

/// Parse a YYYY-MM-DD argument into the start of that day, UTC.
fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| IngestError::InvalidDate(input.to_string()))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| IngestError::InvalidDate(input.to_string()))?;
    Ok(DateTime::from_naive_utc_and_offset(midnight, Utc))
}

fn print_stats(what: &str, stats: &IngestStats) {
    println!();
    println!("{} {}", style("Ingested").bold(), style(what).cyan());
    println!("  Processed: {}", stats.processed);
    println!("  Created:   {}", style(stats.created).green());
    println!("  Updated:   {}", style(stats.updated).green());
    if stats.failed > 0 {
        println!("  Failed:    {}", style(stats.failed).red().bold());
        for message in stats.errors.iter().take(5) {
            println!("    - {message}");
        }
        if stats.errors.len() > 5 {
            println!("    ... and {} more", stats.errors.len() - 5);
        }
    } else {
        println!("  Failed:    0");
    }
}
