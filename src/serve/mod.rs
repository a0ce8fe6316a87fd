// src/serve/mod.rs

//! Dev-server subprocess handle.
//!
//! Spawned at most once per watch session, after the initial sync pass. The
//! handle is owned by the runtime and killed on shutdown; `kill_on_drop`
//! covers abnormal exits of our own process.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tracing::{info, warn};

/// A running dev-server subprocess.
#[derive(Debug)]
pub struct DevServer {
    child: Child,
    cmd: String,
}

impl DevServer {
    /// Spawn the configured dev-server command through the platform shell.
    ///
    /// Stdout/stderr are inherited so the server's own output (e.g. a
    /// live-reload URL) reaches the user directly; stdin is detached.
    pub fn spawn(cmd: &str) -> Result<Self> {
        let mut command = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(cmd);
            c
        };

        command
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let child = command
            .spawn()
            .with_context(|| format!("spawning dev server process for '{cmd}'"))?;

        info!(cmd = %cmd, pid = ?child.id(), "dev server started");

        Ok(Self {
            child,
            cmd: cmd.to_string(),
        })
    }

    /// Kill the subprocess and wait for it to be reaped.
    pub async fn shutdown(mut self) {
        match self.child.kill().await {
            Ok(()) => info!(cmd = %self.cmd, "dev server stopped"),
            Err(err) => warn!(cmd = %self.cmd, error = %err, "failed to kill dev server"),
        }
    }
}
