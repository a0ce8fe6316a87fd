// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod serve;
pub mod sync;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::engine::{Runtime, RuntimeEvent};
use crate::errors::SyncError;
use crate::serve::DevServer;
use crate::sync::synchronizer::{AssetSynchronizer, PlanDecision, SyncReport};
use crate::watch::spawn_watcher;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the initial sync pass
/// - (watch mode) file watcher, dev server, Ctrl-C handling, runtime loop
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let root = config_root_dir(&config_path);
    let synchronizer = AssetSynchronizer::new(
        root.join(&cfg.source_dir),
        root.join(&cfg.dest_dir),
        &cfg.assets,
    );

    if args.dry_run {
        print_dry_run(&cfg, &synchronizer);
        return Ok(());
    }

    let report = synchronizer.initial_sync();
    info!(
        copied = report.copied.len(),
        unchanged = report.unchanged.len(),
        failed = report.failures.len(),
        "initial sync pass finished"
    );

    if args.once {
        return once_result(&report);
    }

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // Watch every asset source path; the synchronizer re-checks membership
    // per event, so stray notifications are harmless.
    let _watcher_handle = spawn_watcher(synchronizer.watch_paths(), rt_tx.clone())?;

    // One dev-server process per watch session, spawned after the first pass.
    let serve = match cfg.serve {
        Some(ref serve_cfg) => Some(DevServer::spawn(&serve_cfg.cmd)?),
        None => None,
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    // SIGTERM → same shutdown path, so the dev server is killed rather than
    // orphaned when the session is terminated by the host.
    #[cfg(unix)]
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut term) => {
                    term.recv().await;
                    let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
                }
                Err(e) => eprintln!("failed to listen for SIGTERM: {e}"),
            }
        });
    }

    let runtime = Runtime::new(synchronizer, rt_rx, serve);
    runtime.run().await
}

/// In `--once` mode a failed destination write is a nonzero exit; missing
/// sources stay warnings, matching the per-asset isolation rules.
fn once_result(report: &SyncReport) -> Result<()> {
    let write_failures = report
        .failures
        .iter()
        .filter(|f| matches!(f, SyncError::DestinationWrite { .. }))
        .count();

    if write_failures > 0 {
        return Err(anyhow!(
            "{} asset cop{} failed; see log output",
            write_failures,
            if write_failures == 1 { "y" } else { "ies" }
        ));
    }
    Ok(())
}

/// Figure out the project root the config's directories are relative to.
/// Currently: directory containing the config file, or `.`.
fn config_root_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Simple dry-run output: print directories and the per-asset decision.
fn print_dry_run(cfg: &ConfigFile, synchronizer: &AssetSynchronizer) {
    println!("assetsync dry-run");
    println!("  source_dir = {}", cfg.source_dir);
    println!("  dest_dir = {}", cfg.dest_dir);
    if let Some(ref serve) = cfg.serve {
        println!("  serve.cmd = {}", serve.cmd);
    }
    println!();

    let plan = synchronizer.plan();
    println!("assets ({}):", plan.len());
    for (asset, decision) in plan {
        let label = match decision {
            PlanDecision::WouldCopy => "would copy",
            PlanDecision::UpToDate => "up to date",
            PlanDecision::SourceUnreadable => "source unreadable",
        };
        println!("  - {asset}: {label}");
    }
}
