// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Plugin discovery and process supervision (spec §4.E, §6.1).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;

use qntx_core::ProcessInfo;
use tokio::process::{Child, Command};

use crate::error::PluginError;

const DEFAULT_BASE_PORT: u16 = 9000;
const DEFAULT_READY_POLL_MS: u64 = 50;
const DEFAULT_READY_MAX_ATTEMPTS: usize = 100; // 100 * 50ms = 5s default (spec §4.E)

/// A spawned plugin process plus the connection info handed to its
/// transport client.
pub struct LaunchedPlugin {
    pub process_info: ProcessInfo,
    pub child: Child,
}

/// Discovers plugin binaries on disk and supervises their processes.
pub struct Supervisor {
    search_paths: Vec<PathBuf>,
    next_port: Arc<AtomicU16>,
    ready_poll: Duration,
    ready_max_attempts: usize,
}

impl Supervisor {
    /// Search order per spec §6.1: `~/.qntx/plugins` then `./plugins`.
    pub fn new() -> Self {
        let mut search_paths = Vec::new();
        if let Some(home) = dirs::home_dir() {
            search_paths.push(home.join(".qntx").join("plugins"));
        }
        search_paths.push(PathBuf::from("./plugins"));

        let base_port: u16 =
            std::env::var("QNTX_PLUGIN_BASE_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(DEFAULT_BASE_PORT);

        Self {
            search_paths,
            next_port: Arc::new(AtomicU16::new(base_port)),
            ready_poll: Duration::from_millis(DEFAULT_READY_POLL_MS),
            ready_max_attempts: DEFAULT_READY_MAX_ATTEMPTS,
        }
    }

    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Locates a plugin's binary, preferring `qntx-{name}-plugin` over
    /// `qntx-{name}` over the bare `{name}`. Must be executable (spec §6.1).
    pub fn find_binary(&self, name: &str) -> Result<PathBuf, PluginError> {
        let candidates = [format!("qntx-{name}-plugin"), format!("qntx-{name}"), name.to_string()];
        for dir in &self.search_paths {
            for candidate in &candidates {
                let path = dir.join(candidate);
                if path.is_file() && is_executable(&path) {
                    return Ok(path);
                }
            }
        }
        Err(PluginError::BinaryNotFound(name.to_string()))
    }

    fn next_port(&self) -> u16 {
        self.next_port.fetch_add(1, Ordering::Relaxed)
    }

    /// Spawns a plugin binary with its listen port and auth token passed as
    /// environment variables, then waits for its health endpoint to respond.
    pub async fn launch(&self, name: &str) -> Result<LaunchedPlugin, PluginError> {
        let binary = self.find_binary(name)?;
        let port = self.next_port();
        let auth_token = generate_auth_token();
        let addr: SocketAddr = format!("127.0.0.1:{port}").parse().map_err(|_| PluginError::SpawnFailed {
            name: name.to_string(),
            message: "failed to construct listen address".to_string(),
        })?;

        let child = Command::new(&binary)
            .env("QNTX_PLUGIN_PORT", port.to_string())
            .env("QNTX_PLUGIN_AUTH_TOKEN", &auth_token)
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| PluginError::SpawnFailed { name: name.to_string(), message: error.to_string() })?;

        let pid = child.id().unwrap_or(0);

        self.wait_for_ready(name, addr).await?;

        tracing::info!(plugin = %name, %addr, pid, "plugin process ready");

        Ok(LaunchedPlugin { process_info: ProcessInfo { addr, pid, auth_token }, child })
    }

    /// Polls the plugin's address until it accepts a TCP connection, or
    /// gives up after `ready_max_attempts` (spec §4.E launch timeout).
    async fn wait_for_ready(&self, name: &str, addr: SocketAddr) -> Result<(), PluginError> {
        for attempt in 0..self.ready_max_attempts {
            if attempt > 0 {
                tokio::time::sleep(self.ready_poll).await;
            }
            if tokio::net::TcpStream::connect(addr).await.is_ok() {
                return Ok(());
            }
        }
        let timeout_secs = (self.ready_max_attempts as u64 * self.ready_poll.as_millis() as u64) / 1000;
        Err(PluginError::LaunchTimedOut { name: name.to_string(), timeout_secs })
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_auth_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// True if any of owner/group/other execute bits are set.
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).map(|metadata| metadata.permissions().mode() & 0o111 != 0).unwrap_or(false)
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
