use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use linkharvest_common::{document_id, EngineConfig, HarvestError};
use linkharvest_engine::aggregate::Harvester;
use linkharvest_engine::dispatch::Workflow;
use linkharvest_engine::fallback::{FileEndpointStore, RemoteFallback};
use linkharvest_engine::notify::{ConsoleNotifier, UserNotifier};
use linkharvest_engine::opener::{CommandOpener, ContextOpener, DryRunOpener};
use linkharvest_engine::run_log::DiscoveryLog;
use linkharvest_engine::snapshot::{DocumentSnapshot, PageSnapshot};

#[derive(Parser)]
#[command(
    name = "linkharvest",
    about = "Discover and batch-open the links in a document snapshot"
)]
struct Args {
    /// Path to a document snapshot JSON fixture.
    snapshot: PathBuf,

    /// Open every valid candidate after discovery.
    #[arg(long)]
    open_valid: bool,

    /// Log opens instead of launching the system opener.
    #[arg(long)]
    dry_run: bool,

    /// Persist the discovery log under the data directory.
    #[arg(long)]
    save_log: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("linkharvest_engine=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = EngineConfig::from_env();

    let snapshot = PageSnapshot::from_json_file(&args.snapshot)?;
    if document_id(snapshot.url()).is_none() {
        return Err(HarvestError::Snapshot(format!(
            "not a document editor page: {}",
            snapshot.url()
        ))
        .into());
    }
    info!(url = snapshot.url(), "Starting discovery cycle");

    let notifier: Arc<dyn UserNotifier> = Arc::new(ConsoleNotifier);
    let opener: Arc<dyn ContextOpener> = if args.dry_run {
        Arc::new(DryRunOpener)
    } else {
        Arc::new(CommandOpener::new())
    };

    let store = Arc::new(FileEndpointStore::new(&config.data_dir));
    let fallback = RemoteFallback::new(store, opener.clone(), notifier.clone());
    let harvester = Harvester::new(&config, fallback);

    let mut log = DiscoveryLog::new(snapshot.url());
    let candidates = harvester.discover(&snapshot, &mut log).await;

    for (i, candidate) in candidates.iter().enumerate() {
        let marker = if candidate.is_valid { "" } else { " (invalid)" };
        println!("{:3}. {}{marker}", i + 1, candidate.text);
        println!("     {}", candidate.url);
    }

    let mut workflow = Workflow::new(opener, notifier, &config);
    if workflow.present(candidates, &mut log) && args.open_valid {
        let outcome = workflow.open_all_valid(&mut log).await?;
        info!(?outcome, "Dispatch finished");
    }

    if args.save_log {
        log.persist(&config.data_dir)?;
    }

    Ok(())
}
