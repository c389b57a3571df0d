// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use super::*;

#[test]
fn active_guard_increments_and_decrements() {
    let sampler = SystemMetricsSampler::new(4);
    assert_eq!(sampler.sample().active_workers, 0);
    let guard = sampler.enter();
    assert_eq!(sampler.sample().active_workers, 1);
    drop(guard);
    assert_eq!(sampler.sample().active_workers, 0);
}

#[test]
fn total_workers_is_fixed_at_construction() {
    let sampler = SystemMetricsSampler::new(8);
    assert_eq!(sampler.sample().total_workers, 8);
}
