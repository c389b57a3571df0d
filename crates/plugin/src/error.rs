// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use qntx_core::{PluginState, VersionError};

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("plugin '{0}' is already registered")]
    DuplicateName(String),

    #[error("no plugin registered named '{0}'")]
    NotFound(String),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("plugin '{name}' cannot {action} while {current}")]
    InvalidTransition { name: String, action: &'static str, current: PluginState },

    #[error("plugin '{0}' does not support pause/resume")]
    NotPausable(String),

    #[error("no binary found for plugin '{0}' in any search path")]
    BinaryNotFound(String),

    #[error("plugin '{name}' did not become ready within {timeout_secs}s")]
    LaunchTimedOut { name: String, timeout_secs: u64 },

    #[error("failed to spawn plugin '{name}': {message}")]
    SpawnFailed { name: String, message: String },

    #[error("{count} plugin(s) failed to shut down cleanly: {}", messages.join("; "))]
    ShutdownFailed { count: usize, messages: Vec<String> },
}
