// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use thiserror::Error;

/// Error taxonomy for the host↔plugin service bridge (spec §4.E "Service
/// bridge to plugins").
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("config key '{0}' is not set")]
    MissingConfig(String),

    #[error("config key '{key}' is not a valid {expected}")]
    WrongConfigType { key: String, expected: &'static str },

    #[error("job '{0}' not found")]
    JobNotFound(String),

    #[error("attestation store error: {0}")]
    Attestation(String),

    #[error("queue error: {0}")]
    Queue(String),
}
