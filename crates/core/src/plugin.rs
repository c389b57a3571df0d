// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Plugin metadata, state machine, and process info.
//!
//! Registration, supervision, and transport live in `qntx-plugin` /
//! `qntx-transport`; this module only holds the data shared across them.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a registered plugin (spec §3.3, §4.E).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginState {
    Loading,
    Running,
    Paused,
    Stopped,
    Failed,
}

crate::simple_display! {
    PluginState {
        Loading => "loading",
        Running => "running",
        Paused => "paused",
        Stopped => "stopped",
        Failed => "failed",
    }
}

impl PluginState {
    /// `IsReady(name)` per spec §4.E: true iff state is `Running`.
    pub fn is_ready(&self) -> bool {
        matches!(self, PluginState::Running)
    }
}

/// Declared metadata for a plugin, returned by its `Metadata()` RPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Semver constraint the plugin requires of the host (e.g. `"^2.0.0"`).
    /// `None` means "always accepted".
    pub required_host_version: Option<String>,
}

/// Optional capabilities a plugin may advertise, discovered at registration
/// time rather than via an inheritance hierarchy (spec §9).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginCapabilities {
    pub pausable: bool,
    pub job_broadcaster: bool,
    pub task_tracker: bool,
    pub llm_stream_broadcaster: bool,
}

/// Connection info for an out-of-process plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub addr: std::net::SocketAddr,
    pub pid: u32,
    pub auth_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_running_is_ready() {
        assert!(PluginState::Running.is_ready());
        assert!(!PluginState::Loading.is_ready());
        assert!(!PluginState::Paused.is_ready());
        assert!(!PluginState::Stopped.is_ready());
        assert!(!PluginState::Failed.is_ready());
    }
}
