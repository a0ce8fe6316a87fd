// src/watch/watcher.rs

use std::path::PathBuf;

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher over the given asset source paths and forward
/// every changed path to the runtime as `RuntimeEvent::PathChanged`.
///
/// Each path is watched non-recursively: the watched set is an explicit file
/// list, so there is no directory tree to observe. A path that cannot be
/// watched (e.g. the source file is missing) is logged and skipped; the other
/// paths are still registered.
pub fn spawn_watcher(
    paths: &[PathBuf],
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("assetsync: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("assetsync: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    let mut registered = 0usize;
    for path in paths {
        match watcher.watch(path, RecursiveMode::NonRecursive) {
            Ok(()) => registered += 1,
            Err(err) => warn!(
                path = ?path,
                error = %err,
                "failed to watch asset source; changes to it will not be picked up"
            ),
        }
    }

    info!(
        registered,
        total = paths.len(),
        "file watcher started on asset source paths"
    );

    // Async task that consumes notify events and forwards changed paths to
    // the runtime.
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("received notify event: {:?}", event);

            for path in event.paths {
                if let Err(err) = runtime_tx.send(RuntimeEvent::PathChanged { path }).await {
                    warn!("failed to send RuntimeEvent::PathChanged: {err}");
                    // If the runtime channel is closed, there's no point
                    // keeping the watcher loop alive.
                    return;
                }
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}
