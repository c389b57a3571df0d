// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! System metrics sampler for the ticker's heartbeat display (spec §4.C).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Snapshot of worker pool occupancy and process memory, as displayed by
/// Pulse's heartbeat line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemMetrics {
    pub active_workers: usize,
    pub total_workers: usize,
    /// Resident memory, in bytes. `None` when unavailable on this platform.
    pub memory_used_bytes: Option<u64>,
    /// Total system memory, in bytes. `None` when unavailable on this platform.
    pub memory_total_bytes: Option<u64>,
}

/// Tracks in-flight worker count via a shared atomic; the pool increments
/// it around each handler dispatch.
#[derive(Clone)]
pub struct SystemMetricsSampler {
    active: Arc<AtomicUsize>,
    total_workers: usize,
}

impl SystemMetricsSampler {
    pub fn new(total_workers: usize) -> Self {
        Self { active: Arc::new(AtomicUsize::new(0)), total_workers }
    }

    /// A guard that decrements the active-worker count on drop, so a
    /// handler panic or early return never leaks the count upward.
    pub fn enter(&self) -> ActiveGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        ActiveGuard { active: self.active.clone() }
    }

    pub fn sample(&self) -> SystemMetrics {
        SystemMetrics {
            active_workers: self.active.load(Ordering::SeqCst),
            total_workers: self.total_workers,
            memory_used_bytes: read_resident_memory(),
            memory_total_bytes: read_total_memory(),
        }
    }
}

pub struct ActiveGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Reads `VmRSS` out of `/proc/self/status` on Linux. Returns `None` on any
/// other platform or on parse failure, rather than guessing.
#[cfg(target_os = "linux")]
fn read_resident_memory() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            let kb: u64 = rest.trim().trim_end_matches(" kB").trim().parse().ok()?;
            return Some(kb * 1024);
        }
    }
    None
}

#[cfg(not(target_os = "linux"))]
fn read_resident_memory() -> Option<u64> {
    None
}

/// Reads `MemTotal` out of `/proc/meminfo` on Linux. Returns `None` on any
/// other platform or on parse failure, rather than guessing.
#[cfg(target_os = "linux")]
fn read_total_memory() -> Option<u64> {
    let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
    for line in meminfo.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            let kb: u64 = rest.trim().trim_end_matches(" kB").trim().parse().ok()?;
            return Some(kb * 1024);
        }
    }
    None
}

#[cfg(not(target_os = "linux"))]
fn read_total_memory() -> Option<u64> {
    None
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
