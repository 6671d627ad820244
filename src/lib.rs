// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;
pub mod watch;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::cli::CliArgs;
use crate::config::SupervisorConfig;
use crate::engine::{Runtime, RuntimeEvent, Supervisor};
use crate::exec::TokioLauncher;
use crate::watch::NotifyWatcher;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (file + CLI overrides)
/// - the supervisor with the real launcher and `notify` watcher
/// - Ctrl-C handling
/// - the runtime event loop
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = config::resolve(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let (rt_tx, rt_rx) = mpsc::unbounded_channel::<RuntimeEvent>();

    let mut supervisor = Supervisor::new(cfg, TokioLauncher::new(), NotifyWatcher::new());
    supervisor.start(rt_tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested);
        });
    }
    drop(rt_tx);

    let runtime = Runtime::new(supervisor, rt_rx);
    runtime.run().await?;
    Ok(())
}

fn print_dry_run(cfg: &SupervisorConfig) {
    println!("watchrun dry run");
    println!("  command: {}", cfg.command);
    println!("  watch dir: {:?}", cfg.target.dir);
    println!("  recursive: {}", cfg.target.recursive);
    println!("  extensions: {:?}", cfg.filter.extensions());
    if !cfg.filter.exclude_patterns().is_empty() {
        println!(
            "  exclude: {:?} (relative to {:?})",
            cfg.filter.exclude_patterns(),
            cfg.filter.root()
        );
    }
    println!("  stop timeout: {:?}", cfg.stop_timeout);
    if !cfg.debounce.is_zero() {
        println!("  debounce: {:?}", cfg.debounce);
    }

    debug!("dry-run complete (nothing launched)");
}
