// src/engine/runtime.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::serve::DevServer;
use crate::sync::synchronizer::{AssetSynchronizer, ChangeOutcome};

/// Events sent into the runtime from the watcher or external signals.
///
/// - the file watcher sends `PathChanged`
/// - Ctrl-C handling sends `ShutdownRequested`
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    PathChanged { path: PathBuf },
    ShutdownRequested,
}

/// The watch-mode event loop.
///
/// Responsibilities:
/// - Consume `RuntimeEvent`s from the watcher and the signal handler.
/// - Route changed paths into the synchronizer, one at a time (single
///   writer per destination path).
/// - Own the optional dev-server handle and kill it on shutdown.
pub struct Runtime {
    synchronizer: AssetSynchronizer,

    /// Unified event stream from all producers (watcher, signal handler).
    events_rx: mpsc::Receiver<RuntimeEvent>,

    /// Dev-server subprocess for this session, if `[serve]` is configured.
    serve: Option<DevServer>,
}

impl Runtime {
    pub fn new(
        synchronizer: AssetSynchronizer,
        events_rx: mpsc::Receiver<RuntimeEvent>,
        serve: Option<DevServer>,
    ) -> Self {
        Self {
            synchronizer,
            events_rx,
            serve,
        }
    }

    /// Main event loop.
    ///
    /// This should be called from `lib.rs` after the initial sync pass has
    /// run and the watcher has been spawned with a clone of the
    /// `mpsc::Sender<RuntimeEvent>`.
    pub async fn run(mut self) -> Result<()> {
        info!("assetsync runtime started");

        while let Some(event) = self.events_rx.recv().await {
            debug!(?event, "runtime received event");

            match event {
                RuntimeEvent::PathChanged { path } => self.handle_path_changed(&path),
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested, stopping runtime");
                    break;
                }
            }
        }

        if let Some(server) = self.serve.take() {
            server.shutdown().await;
        }

        info!("assetsync runtime exiting");
        Ok(())
    }

    /// Route one changed path into the synchronizer.
    ///
    /// A failed copy is surfaced in the log but never stops the loop; the
    /// next change event for the same asset will retry.
    fn handle_path_changed(&self, path: &Path) {
        match self.synchronizer.on_source_changed(path) {
            // Copies and skips are logged inside the synchronizer.
            Ok(ChangeOutcome::Ignored)
            | Ok(ChangeOutcome::Unchanged)
            | Ok(ChangeOutcome::Copied)
            | Ok(ChangeOutcome::SourceGone) => {}
            Err(err) => {
                error!(error = %err, "asset copy failed on change event");
            }
        }
    }
}
