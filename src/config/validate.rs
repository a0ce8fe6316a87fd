// src/config/validate.rs

use std::path::{Component, Path};

use anyhow::{Result, anyhow};

use crate::config::model::ConfigFile;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - there is at least one asset
/// - every asset path is relative and stays inside its directory
///   (no absolute paths, no `..` segments)
/// - `[serve].cmd`, when present, is not empty
///
/// It does **not** check that the asset files exist; a missing source is a
/// per-asset warning at sync time, not a config error.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_has_assets(cfg)?;
    validate_asset_paths(cfg)?;
    validate_serve(cfg)?;
    Ok(())
}

fn ensure_has_assets(cfg: &ConfigFile) -> Result<()> {
    if cfg.assets.is_empty() {
        return Err(anyhow!("config must list at least one entry in `assets`"));
    }
    Ok(())
}

fn validate_asset_paths(cfg: &ConfigFile) -> Result<()> {
    for asset in cfg.assets.iter() {
        if asset.trim().is_empty() {
            return Err(anyhow!("`assets` contains an empty path"));
        }

        let path = Path::new(asset);
        if path.is_absolute() {
            return Err(anyhow!(
                "asset '{}' must be a relative path (resolved against source_dir and dest_dir)",
                asset
            ));
        }

        for component in path.components() {
            if matches!(component, Component::ParentDir) {
                return Err(anyhow!(
                    "asset '{}' must not contain `..` segments",
                    asset
                ));
            }
        }
    }
    Ok(())
}

fn validate_serve(cfg: &ConfigFile) -> Result<()> {
    if let Some(ref serve) = cfg.serve {
        if serve.cmd.trim().is_empty() {
            return Err(anyhow!("[serve].cmd must not be empty"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{ConfigFile, ServeConfig};

    fn base_config(assets: Vec<&str>) -> ConfigFile {
        ConfigFile {
            source_dir: "src".to_string(),
            dest_dir: "dist".to_string(),
            assets: assets.into_iter().map(String::from).collect(),
            serve: None,
        }
    }

    #[test]
    fn accepts_plain_relative_assets() {
        let cfg = base_config(vec!["index.html", "css/app.css"]);
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn rejects_empty_asset_list() {
        let cfg = base_config(vec![]);
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn rejects_parent_dir_escape() {
        let cfg = base_config(vec!["../outside.html"]);
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn rejects_absolute_asset_path() {
        let cfg = base_config(vec!["/etc/hosts"]);
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn rejects_blank_serve_cmd() {
        let mut cfg = base_config(vec!["index.html"]);
        cfg.serve = Some(ServeConfig {
            cmd: "   ".to_string(),
        });
        assert!(validate_config(&cfg).is_err());
    }
}
