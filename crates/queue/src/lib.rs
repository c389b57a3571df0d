// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qntx-queue: the persistent async job queue (spec §4.B).
//!
//! Wraps [`qntx_storage::Store`] with dedup-aware enqueue, atomic dequeue,
//! a pause/resume/complete/fail lifecycle, parent/child deletion, and
//! non-blocking pub/sub notifications for UI subscribers.

mod error;
mod queue;
mod subscriber;

pub use error::QueueError;
pub use queue::{AsyncQueue, JobCounts, QueueStats};
pub use subscriber::{JobUpdate, SubscriptionId};
