// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use std::sync::Arc;

use qntx_core::{FakeClock, ScheduledJob, ScheduledJobId, ScheduledJobState};
use qntx_storage::Engine;
use qntx_worker::SystemMetricsSampler;

use super::*;

fn scheduled(handler_name: &str, source_url: &str, interval_seconds: u64, next_run_at: u64) -> ScheduledJob {
    ScheduledJob {
        id: ScheduledJobId::new(),
        interval_seconds,
        handler_name: handler_name.to_string(),
        payload: Vec::new(),
        source_url: source_url.to_string(),
        ats_code: String::new(),
        next_run_at: Some(next_run_at),
        last_run_at: None,
        last_execution_id: None,
        state: ScheduledJobState::Active,
        created_from_doc_id: None,
        metadata: Vec::new(),
        created_at: 0,
        updated_at: 0,
    }
}

fn fixture() -> (Arc<Engine>, Ticker<Engine, FakeClock>) {
    let store = Arc::new(Engine::in_memory());
    let clock = FakeClock::new();
    let queue = Arc::new(AsyncQueue::new(store.clone(), clock.clone()));
    let metrics = SystemMetricsSampler::new(2);
    let ticker = Ticker::new(store.clone(), queue, clock, metrics, 90);
    (store, ticker)
}

#[test]
fn due_job_materializes_into_a_queued_async_job() {
    let (store, ticker) = fixture();
    let job = scheduled("ingest.fetch", "https://a", 60, ticker_now(&ticker));
    let id = job.id;
    store.create_scheduled_job(job).unwrap();

    ticker.tick().unwrap();

    let updated = store.get_scheduled_job(&id).unwrap().unwrap();
    assert!(updated.next_run_at.unwrap() > ticker_now(&ticker));
    assert!(updated.last_execution_id.is_some());

    let jobs = store.list_active_jobs(10).unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].handler_name, "ingest.fetch");
}

#[test]
fn empty_handler_name_fails_the_execution_without_enqueueing() {
    let (store, ticker) = fixture();
    let job = scheduled("", "https://a", 60, ticker_now(&ticker));
    store.create_scheduled_job(job).unwrap();

    ticker.tick().unwrap();

    assert!(store.list_active_jobs(10).unwrap().is_empty());
}

#[test]
fn dedup_reuses_existing_active_job_instead_of_enqueueing_twice() {
    let (store, ticker) = fixture();
    let job = scheduled("ingest.fetch", "https://a", 60, ticker_now(&ticker));
    store.create_scheduled_job(job.clone()).unwrap();

    ticker.tick().unwrap();
    let after_first = store.list_active_jobs(10).unwrap();
    assert_eq!(after_first.len(), 1);

    // Re-mark the same schedule due again (simulating a second tick before
    // the async job finished) and confirm no duplicate is enqueued.
    store
        .update_after_execution(
            &job.id,
            ticker_now(&ticker),
            qntx_core::ExecutionId::new(),
            Some(ticker_now(&ticker)),
            ticker_now(&ticker),
        )
        .unwrap();
    ticker.tick().unwrap();

    assert_eq!(store.list_active_jobs(10).unwrap().len(), 1);
}

#[test]
fn one_shot_schedule_is_not_rearmed() {
    let (store, ticker) = fixture();
    let job = scheduled("ingest.fetch", "https://a", 0, ticker_now(&ticker));
    let id = job.id;
    store.create_scheduled_job(job).unwrap();

    ticker.tick().unwrap();

    let updated = store.get_scheduled_job(&id).unwrap().unwrap();
    assert_eq!(updated.next_run_at, None);
}

fn ticker_now(ticker: &Ticker<Engine, FakeClock>) -> u64 {
    ticker.clock.epoch_ms()
}
