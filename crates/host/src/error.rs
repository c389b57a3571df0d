// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use thiserror::Error;

/// Error taxonomy for composing and booting the host process (spec §7,
/// Configuration kind).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine home directory for config resolution")]
    NoHomeDir,
    #[error("failed to read config file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
    #[error("config key '{key}' has the wrong type: expected {expected}")]
    WrongType { key: String, expected: &'static str },
}
