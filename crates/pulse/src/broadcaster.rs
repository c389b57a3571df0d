// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Optional fan-out of Pulse execution events, e.g. to a UI (spec §4.D).

use qntx_core::Execution;

/// Notified around a scheduled job's execution. Implementations must not
/// block; the ticker calls these inline between store writes.
pub trait PulseBroadcaster: Send + Sync {
    fn execution_started(&self, execution: &Execution) {
        let _ = execution;
    }

    fn execution_completed(&self, execution: &Execution) {
        let _ = execution;
    }

    fn execution_failed(&self, execution: &Execution, message: &str) {
        let _ = (execution, message);
    }
}

/// A broadcaster that does nothing, for deployments with no UI attached.
pub struct NoopBroadcaster;

impl PulseBroadcaster for NoopBroadcaster {}
