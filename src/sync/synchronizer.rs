// src/sync/synchronizer.rs

//! The conditional-copy core: mirror an explicit list of asset files from a
//! source directory into a destination directory, copying only when the
//! content digests differ or the destination is absent.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::errors::SyncError;
use crate::sync::digest::digest_bytes;
use crate::watch::path_utils::normalize_path;

/// One configured asset with its resolved paths.
///
/// `source_normalized` is the canonical form used for change-event matching;
/// it is precomputed once at construction.
#[derive(Debug, Clone)]
struct WatchedAsset {
    rel: String,
    source: PathBuf,
    source_normalized: PathBuf,
    dest: PathBuf,
}

/// Result of a full sync pass over all configured assets.
///
/// Copies and skips are also logged, but the report is the programmatic
/// surface: one asset's failure never blocks another, so callers need the
/// per-asset breakdown to decide what to do.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Assets that were copied this pass (relative paths, config order).
    pub copied: Vec<String>,
    /// Assets whose destination already matched.
    pub unchanged: Vec<String>,
    /// Per-asset failures; the rest of the batch still ran.
    pub failures: Vec<SyncError>,
}

impl SyncReport {
    /// True when no asset failed this pass.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of handling a single change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The path is not in the watched set; nothing was done.
    Ignored,
    /// Watched asset whose content already matches the destination
    /// (e.g. a touch without modification).
    Unchanged,
    /// The asset was re-copied to the destination.
    Copied,
    /// The source could not be read at notification time (e.g. deleted
    /// between the change event and handling). The destination is left
    /// untouched; a warning has been logged.
    SourceGone,
}

/// Dry-run decision for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanDecision {
    WouldCopy,
    UpToDate,
    SourceUnreadable,
}

/// Internal per-asset decision. `Copy` carries the source bytes so the write
/// uses exactly the content that was hashed.
enum Decision {
    Copy { bytes: Vec<u8> },
    Unchanged,
}

/// Mirrors watched assets from a source directory into a destination
/// directory.
///
/// Holds no state beyond the resolved path table; every decision re-reads
/// both files, so it is safe to call [`initial_sync`](Self::initial_sync)
/// repeatedly (a second pass with unchanged inputs performs zero copies).
#[derive(Debug)]
pub struct AssetSynchronizer {
    assets: Vec<WatchedAsset>,
    watch_paths: Vec<PathBuf>,
}

impl AssetSynchronizer {
    /// Build the per-asset path table.
    ///
    /// `assets` are relative paths resolved against both directories. No
    /// filesystem writes happen here; normalization canonicalizes the source
    /// paths best-effort (a source that does not exist yet falls back to a
    /// lexical absolute form).
    pub fn new(
        source_dir: impl AsRef<Path>,
        dest_dir: impl AsRef<Path>,
        assets: &[String],
    ) -> Self {
        let source_dir = source_dir.as_ref();
        let dest_dir = dest_dir.as_ref();

        let assets: Vec<WatchedAsset> = assets
            .iter()
            .map(|rel| {
                let source = source_dir.join(rel);
                let source_normalized = normalize_path(&source);
                WatchedAsset {
                    rel: rel.clone(),
                    source,
                    source_normalized,
                    dest: dest_dir.join(rel),
                }
            })
            .collect();

        let watch_paths = assets.iter().map(|a| a.source_normalized.clone()).collect();

        Self {
            assets,
            watch_paths,
        }
    }

    /// The absolute source paths the host watch facility should observe:
    /// exactly all watched assets, whether or not a copy ever occurred.
    pub fn watch_paths(&self) -> &[PathBuf] {
        &self.watch_paths
    }

    /// Synchronize every configured asset, in config order.
    ///
    /// Per-asset isolation: an unreadable source is a warning, a failed write
    /// an error, and either way the remaining assets are still processed.
    pub fn initial_sync(&self) -> SyncReport {
        let mut report = SyncReport::default();

        for asset in &self.assets {
            match self.sync_one(asset) {
                Ok(true) => {
                    info!(asset = %asset.rel, "copied (initial)");
                    report.copied.push(asset.rel.clone());
                }
                Ok(false) => {
                    debug!(asset = %asset.rel, "destination up to date");
                    report.unchanged.push(asset.rel.clone());
                }
                Err(err) => {
                    match &err {
                        SyncError::SourceUnreadable { .. } => warn!(error = %err, "skipping asset"),
                        SyncError::DestinationWrite { .. } => error!(error = %err, "copy failed"),
                    }
                    report.failures.push(err);
                }
            }
        }

        report
    }

    /// Handle a change notification from the host's file watcher.
    ///
    /// The path is normalized and matched exactly against the precomputed
    /// watched-set; unmatched paths are a no-op so other watchers can act on
    /// them. A matched asset goes through the same synchronize-if-different
    /// logic as the initial pass, so a touch without modification copies
    /// nothing.
    ///
    /// Only a destination write failure is returned as an error; a vanished
    /// source is reported via [`ChangeOutcome::SourceGone`] and leaves the
    /// previous destination content in place.
    pub fn on_source_changed(&self, changed: &Path) -> Result<ChangeOutcome, SyncError> {
        let normalized = normalize_path(changed);

        let Some(asset) = self
            .assets
            .iter()
            .find(|a| a.source_normalized == normalized)
        else {
            debug!(path = ?changed, "change event for unwatched path; ignoring");
            return Ok(ChangeOutcome::Ignored);
        };

        match self.sync_one(asset) {
            Ok(true) => {
                info!(asset = %asset.rel, "copied (updated)");
                Ok(ChangeOutcome::Copied)
            }
            Ok(false) => {
                debug!(asset = %asset.rel, "change event but content unchanged");
                Ok(ChangeOutcome::Unchanged)
            }
            Err(SyncError::SourceUnreadable { asset, source }) => {
                warn!(
                    asset = %asset,
                    error = %source,
                    "source unreadable on change; keeping previous destination content"
                );
                Ok(ChangeOutcome::SourceGone)
            }
            Err(err) => Err(err),
        }
    }

    /// Evaluate every asset's sync decision without writing anything.
    pub fn plan(&self) -> Vec<(String, PlanDecision)> {
        self.assets
            .iter()
            .map(|asset| {
                let decision = match self.decide(asset) {
                    Ok(Decision::Copy { .. }) => PlanDecision::WouldCopy,
                    Ok(Decision::Unchanged) => PlanDecision::UpToDate,
                    Err(_) => PlanDecision::SourceUnreadable,
                };
                (asset.rel.clone(), decision)
            })
            .collect()
    }

    /// Synchronize one asset. Returns `Ok(true)` if a copy happened.
    fn sync_one(&self, asset: &WatchedAsset) -> Result<bool, SyncError> {
        match self.decide(asset)? {
            Decision::Copy { bytes } => {
                self.write_dest(asset, &bytes)?;
                Ok(true)
            }
            Decision::Unchanged => Ok(false),
        }
    }

    /// The synchronize-if-different rule: copy iff the destination is
    /// missing/unreadable or its digest differs from the source's.
    fn decide(&self, asset: &WatchedAsset) -> Result<Decision, SyncError> {
        let src_bytes = fs::read(&asset.source).map_err(|e| SyncError::SourceUnreadable {
            asset: asset.rel.clone(),
            source: e,
        })?;

        let differs = match fs::read(&asset.dest) {
            Ok(dst_bytes) => digest_bytes(&src_bytes) != digest_bytes(&dst_bytes),
            // Missing or unreadable destination always re-copies.
            Err(_) => true,
        };

        Ok(if differs {
            Decision::Copy { bytes: src_bytes }
        } else {
            Decision::Unchanged
        })
    }

    /// Write the destination file via a sibling temp file plus rename, so a
    /// torn write is never visible at the final path. Best effort only;
    /// crash consistency is not guaranteed.
    fn write_dest(&self, asset: &WatchedAsset, bytes: &[u8]) -> Result<(), SyncError> {
        let write_err = |e: std::io::Error| SyncError::DestinationWrite {
            asset: asset.rel.clone(),
            dest: asset.dest.clone(),
            source: e,
        };

        if let Some(parent) = asset.dest.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp = temp_sibling(&asset.dest);
        fs::write(&tmp, bytes).map_err(write_err)?;

        if let Err(first) = fs::rename(&tmp, &asset.dest) {
            // Windows refuses to rename over an existing file, so clear the
            // destination there and retry once. POSIX rename replaces the
            // destination atomically, so on Unix a rename failure means
            // something else is wrong and the old content must stay intact.
            let recovered = cfg!(windows)
                && fs::remove_file(&asset.dest)
                    .and_then(|_| fs::rename(&tmp, &asset.dest))
                    .is_ok();
            if !recovered {
                let _ = fs::remove_file(&tmp);
                return Err(write_err(first));
            }
        }

        Ok(())
    }
}

/// Temp file name next to the destination, so the final rename stays within
/// one directory (and one filesystem).
fn temp_sibling(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "asset".to_string());
    dest.with_file_name(format!(".{}.assetsync-{}", name, std::process::id()))
}
