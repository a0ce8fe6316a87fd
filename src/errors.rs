// src/errors.rs

//! Crate-wide error types.
//!
//! Fallible plumbing (config loading, watcher setup) uses `anyhow` with
//! context. Per-asset sync failures use the structured [`SyncError`] taxonomy
//! so callers can distinguish a skippable missing source from a failed write.

use std::path::PathBuf;

use thiserror::Error;

/// Per-asset failure during a sync pass.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Source file missing or inaccessible at decision time.
    ///
    /// Non-fatal: the asset is skipped for this pass and the previous
    /// destination content (if any) is left untouched.
    #[error("source unreadable for asset '{asset}': {source}")]
    SourceUnreadable {
        asset: String,
        #[source]
        source: std::io::Error,
    },

    /// Directory creation or file copy failed (permissions, disk full).
    ///
    /// Surfaced per asset; does not abort the rest of the batch.
    #[error("failed to write destination '{dest}' for asset '{asset}': {source}")]
    DestinationWrite {
        asset: String,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// The relative asset path this failure belongs to.
    pub fn asset(&self) -> &str {
        match self {
            SyncError::SourceUnreadable { asset, .. } => asset,
            SyncError::DestinationWrite { asset, .. } => asset,
        }
    }
}

pub use anyhow::{Error, Result};
