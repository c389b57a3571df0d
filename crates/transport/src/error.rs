// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use thiserror::Error;

/// Error taxonomy for the plugin RPC transport (spec §7, Transport kind).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("message exceeds max frame size ({len} > {max})")]
    FrameTooLarge { len: usize, max: usize },

    #[error("malformed RPC payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("auth token mismatch")]
    Unauthorized,

    #[error("plugin returned an error: {0}")]
    PluginError(String),

    #[error("unexpected response variant for this request")]
    UnexpectedResponse,

    #[error("RPC call timed out after {timeout_secs}s")]
    TimedOut { timeout_secs: u64 },
}
