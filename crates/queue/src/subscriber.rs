// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Job update fan-out: bounded, non-blocking, never reordered (spec §4.B, §5).

use qntx_core::{Job, JobId};
use tokio::sync::mpsc;

/// Channel capacity for a single subscriber (spec §4.B).
pub const SUBSCRIBER_CAPACITY: usize = 100;

/// A notification pushed to subscribers on every job lifecycle change.
#[derive(Debug, Clone)]
pub enum JobUpdate {
    Enqueued(Job),
    Dequeued(Job),
    Paused(Job),
    Resumed(Job),
    Completed(Job),
    Failed(Job),
    Cancelled(Job),
    Deleted(JobId),
}

/// Opaque handle identifying a subscription for [`crate::AsyncQueue::unsubscribe`].
///
/// Channel ownership stays with the caller: unsubscribing only detaches the
/// queue's sender, it does not close the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(pub(crate) u64);

pub(crate) struct Subscribers {
    next_id: u64,
    channels: Vec<(u64, mpsc::Sender<JobUpdate>)>,
}

impl Subscribers {
    pub(crate) fn new() -> Self {
        Self { next_id: 0, channels: Vec::new() }
    }

    pub(crate) fn add(&mut self) -> (SubscriptionId, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CAPACITY);
        let id = self.next_id;
        self.next_id += 1;
        self.channels.push((id, tx));
        (SubscriptionId(id), rx)
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) {
        self.channels.retain(|(existing, _)| *existing != id.0);
    }

    /// Non-blocking fan-out. A full subscriber channel silently drops the
    /// update rather than stalling the queue (spec §4.B, §5, §9).
    pub(crate) fn notify(&self, update: JobUpdate) {
        for (id, tx) in &self.channels {
            if let Err(mpsc::error::TrySendError::Full(_)) = tx.try_send(update.clone()) {
                tracing::warn!(subscriber_id = id, "dropping job update: subscriber channel full");
            }
        }
    }
}
