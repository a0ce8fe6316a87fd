// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// source_dir = "src"
/// dest_dir = "dist"
/// assets = ["index.html", "index.css", "favicon.png"]
///
/// [serve]
/// cmd = "npm run start -- --dev"
/// ```
///
/// `assets` are relative paths, resolved against both `source_dir` (where the
/// file is read and watched) and `dest_dir` (where the mirror is written).
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Directory the asset files are read from.
    pub source_dir: String,

    /// Directory the asset files are mirrored into.
    pub dest_dir: String,

    /// Relative paths of the files to keep in sync.
    ///
    /// Order is the order of the initial sync pass. Duplicates are harmless;
    /// the second occurrence just re-checks an already-synced file.
    pub assets: Vec<String>,

    /// Optional `[serve]` section for the dev-server subprocess.
    #[serde(default)]
    pub serve: Option<ServeConfig>,
}

/// `[serve]` section.
///
/// When present, the command is spawned once per watch session after the
/// initial sync pass, and killed when the session shuts down. Ignored in
/// `--once` mode.
#[derive(Debug, Clone, Deserialize)]
pub struct ServeConfig {
    /// Shell command to run (e.g. a dev server with live reload).
    pub cmd: String,
}
