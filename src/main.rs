//! Ledger Search Indexer
//!
//! Exports ledger history and ingests newly closed ledgers into the search
//! backend.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledger_indexer::adapters::{ElasticClient, NdjsonLedgerSource};
use ledger_indexer::core::{IndexCatalog, LedgerSource};
use ledger_indexer::services::{
    ExportConfig, ExportPipeline, ExportRange, GapFiller, IngestPipeline, RetryPolicy,
    StartPosition,
};
use ledger_indexer::IndexerConfig;

#[derive(Parser)]
#[command(name = "ledger-indexer")]
#[command(about = "Ledger history exporter for the search backend")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "indexer.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Ledgers built in parallel
    #[arg(short = 'C', long)]
    concurrency: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the document indexes
    CreateIndex {
        /// Delete indexes before creation
        #[arg(long)]
        force: bool,
    },
    /// Export a range of ledgers
    Export {
        /// First ledger; +N is an offset from the first known ledger,
        /// -N counts back from the last one, 0 is the first known ledger
        #[arg(default_value = "0", allow_hyphen_values = true)]
        start: StartPosition,

        /// Number of ledgers; defaults to everything up to the last known ledger
        count: Option<u32>,

        /// Ledgers per bulk submission
        #[arg(short, long)]
        batch: Option<u32>,

        /// Retries per bulk submission
        #[arg(long)]
        retries: Option<u32>,

        /// Build documents without sending them
        #[arg(long)]
        dry_run: bool,

        /// Print built documents
        #[arg(long)]
        verbose: bool,
    },
    /// Index ledgers as they close
    Ingest {
        /// Ledger to start ingesting from
        start: Option<u32>,
    },
    /// Print ledger source statistics
    Stats,
    /// Print indexed ledger statistics
    EsStats,
    /// Export ledgers missing between the lowest and highest indexed ledger
    FillGaps {
        /// Only print missing ranges
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = IndexerConfig::load(Some(cli.config.as_path()))?;
    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }
    if let Some(concurrency) = cli.concurrency {
        config.export.concurrency = concurrency;
    }

    init_logging(&config)?;

    if let Err(e) = run(cli.command, config).await {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(command: Command, mut config: IndexerConfig) -> Result<()> {
    let source: Arc<NdjsonLedgerSource> = Arc::new(NdjsonLedgerSource::new(
        config.source.path.clone(),
        Duration::from_millis(config.ingest.poll_interval_ms),
    ));

    match command {
        Command::CreateIndex { force } => {
            let elastic = ElasticClient::new(&config.elastic)?;
            elastic.create_indexes(force).await?;
            info!("Indexes ready");
        }
        Command::Export {
            start,
            count,
            batch,
            retries,
            dry_run,
            verbose,
        } => {
            if let Some(batch) = batch {
                config.export.batch_size = batch;
            }
            if let Some(retries) = retries {
                config.retry.retries = retries;
            }
            config.validate()?;

            if count == Some(0) {
                anyhow::bail!("Nothing to export: count must be positive");
            }

            let bounds = if start.needs_bounds() || count.is_none() {
                source.ledger_bounds().await?
            } else {
                None
            };
            let range = ExportRange::resolve(start, count, bounds)?;

            let elastic = Arc::new(ElasticClient::new(&config.elastic)?);
            let export_config = ExportConfig {
                dry_run,
                verbose,
                ..ExportConfig::from_config(&config)
            };
            let summary = ExportPipeline::new(source, elastic, export_config)
                .run(range)
                .await?;
            info!(
                "Exported {} ledgers, {} documents, {} bytes",
                summary.ledgers, summary.documents, summary.bytes
            );
        }
        Command::Ingest { start } => {
            let elastic = Arc::new(ElasticClient::new(&config.elastic)?);
            let mut pipeline =
                IngestPipeline::new(source, elastic, RetryPolicy::from_config(&config.retry));
            if let Some(start) = start {
                pipeline = pipeline.with_start(start);
            }

            tokio::select! {
                result = pipeline.run() => {
                    result?;
                }
                _ = signal::ctrl_c() => {
                    info!("Received shutdown signal");
                }
            }
        }
        Command::Stats => match source.ledger_bounds().await? {
            Some(bounds) => println!(
                "first: {}, last: {}, count: {}",
                bounds.first,
                bounds.last,
                bounds.count()
            ),
            None => println!("Ledger source is empty"),
        },
        Command::EsStats => {
            let stats = ElasticClient::new(&config.elastic)?.ledger_stats().await?;
            match (stats.min_seq, stats.max_seq) {
                (Some(min), Some(max)) => {
                    println!("count: {}, min: {}, max: {}", stats.count, min, max)
                }
                _ => println!("No ledgers indexed"),
            }
        }
        Command::FillGaps { dry_run } => {
            let elastic = Arc::new(ElasticClient::new(&config.elastic)?);
            let pipeline =
                ExportPipeline::new(source, elastic.clone(), ExportConfig::from_config(&config));
            let gaps = GapFiller::new(elastic, pipeline).run(dry_run).await?;
            info!("{} gaps processed", gaps.len());
        }
    }

    Ok(())
}

fn init_logging(config: &IndexerConfig) -> Result<()> {
    let log_level = config
        .monitoring
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("ledger_indexer={}", log_level).into());

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Ok(())
}
