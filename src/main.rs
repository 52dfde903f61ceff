use clap::{Parser, Subcommand};
use comicsync::config::Config;
use comicsync::schedule::{Scheduler, run_polling};
use comicsync::sync::{ReconcileOutcome, Reconciler};
use comicsync::{XkcdClient, db, transform, utils::logging};
use mimalloc::MiMalloc;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "comicsync", version, about = "Keep a database in sync with the xkcd archive")]
struct Cli {
    /// Configuration file (default: ./comicsync.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// Poll for new comics until interrupted
    Poll,
    /// Run a single reconciliation cycle and exit
    Once,
    /// Create the database and the comics table if missing
    InitDb,
    /// Run the transformation tool steps (dbt run, dbt test)
    Transform,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let cfg = Config::load(cli.config.as_deref())?;
    let _log_guard = logging::init_tracing(&cfg.basic)?;

    info!(
        command = ?cli.command,
        loglevel = %cfg.basic.loglevel,
        log_file = ?cfg.basic.log_file,
        base_url = %cfg.source.base_url,
        proxy = %cfg.source.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        database = %cfg.database.describe(),
        interval_secs = cfg.poll.interval_secs,
        quiet_start = ?cfg.poll.quiet_start,
        quiet_end = ?cfg.poll.quiet_end,
        "Configuration loaded"
    );

    match cli.command {
        Command::InitDb => {
            let report = db::init_database(&cfg.database).await?;
            info!(
                backend = report.backend,
                database_created = report.database_created,
                "Database bootstrap complete"
            );
        }
        Command::Transform => {
            transform::run_transform(&cfg.transform).await?;
        }
        Command::Once => {
            let reconciler = build_reconciler(&cfg).await?;
            match reconciler.reconcile().await {
                Ok(ReconcileOutcome::UpToDate { latest, .. }) => {
                    info!(latest, "Storage already up to date");
                }
                Ok(ReconcileOutcome::Backfilled(report)) => {
                    info!(
                        inserted = report.inserted,
                        skipped = report.skipped,
                        failed = ?report.failed,
                        "Single cycle finished"
                    );
                }
                Err(e) => error!(error = %e, "Reconciliation cycle failed"),
            }
        }
        Command::Poll => {
            let reconciler = build_reconciler(&cfg).await?;
            let scheduler = Scheduler::from_config(&cfg.poll);
            run_polling(&reconciler, &scheduler, shutdown_signal()).await;
            info!("Poller has shut down gracefully.");
        }
    }
    Ok(())
}

/// Builds the client and store, then checks that storage is reachable and the
/// table exists before any cycle runs.
async fn build_reconciler(cfg: &Config) -> Result<Reconciler, Box<dyn std::error::Error>> {
    let source = XkcdClient::new(&cfg.source)?;
    let store = db::store_from_config(&cfg.database)?;

    match db::probe(store.as_ref()).await {
        Ok(stored_max) => info!(
            backend = store.backend(),
            stored_max = ?stored_max,
            "Storage reachable"
        ),
        Err(e) => {
            error!(
                backend = store.backend(),
                database = %cfg.database.describe(),
                error = %e,
                "Storage unreachable at startup; run `comicsync init-db` if the table is missing"
            );
            return Err(e.into());
        }
    }

    Ok(Reconciler::new(source, store))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C"),
        () = terminate => info!("Received SIGTERM"),
    }
}
