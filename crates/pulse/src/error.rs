// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use qntx_queue::QueueError;
use qntx_storage::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}
