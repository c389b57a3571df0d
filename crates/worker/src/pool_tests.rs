// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use qntx_core::{FakeClock, Job, JobStatus};
use qntx_storage::Engine;

use crate::handler::{Handler, HandlerOutcome, HandlerRegistry};

use super::*;

struct AlwaysSucceeds;

#[async_trait]
impl Handler for AlwaysSucceeds {
    fn name(&self) -> &str {
        "succeed"
    }

    async fn execute(&self, _ctx: &CancellationToken, _job: &Job) -> Result<HandlerOutcome, String> {
        Ok(HandlerOutcome::default())
    }
}

struct AlwaysFails;

#[async_trait]
impl Handler for AlwaysFails {
    fn name(&self) -> &str {
        "fail"
    }

    async fn execute(&self, _ctx: &CancellationToken, _job: &Job) -> Result<HandlerOutcome, String> {
        Err("boom".to_string())
    }
}

async fn wait_until<F: Fn() -> bool>(predicate: F) {
    for _ in 0..200 {
        if predicate() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition never became true");
}

#[tokio::test]
async fn successful_handler_completes_job() {
    let queue = Arc::new(AsyncQueue::new(Arc::new(Engine::in_memory()), FakeClock::new()));
    let registry = Arc::new(HandlerRegistry::new());
    registry.register(Arc::new(AlwaysSucceeds));

    let pool = WorkerPool::spawn(queue.clone(), registry, 1);

    let job = Job::builder().handler_name("succeed").source("s").build();
    let id = queue.enqueue(job).unwrap();

    wait_until(|| queue.get(&id).unwrap().unwrap().status == JobStatus::Completed).await;

    pool.shutdown().await;
}

#[tokio::test]
async fn failing_handler_fails_job_with_message() {
    let queue = Arc::new(AsyncQueue::new(Arc::new(Engine::in_memory()), FakeClock::new()));
    let registry = Arc::new(HandlerRegistry::new());
    registry.register(Arc::new(AlwaysFails));

    let pool = WorkerPool::spawn(queue.clone(), registry, 1);

    let job = Job::builder().handler_name("fail").source("s").build();
    let id = queue.enqueue(job).unwrap();

    wait_until(|| queue.get(&id).unwrap().unwrap().status == JobStatus::Failed).await;
    assert_eq!(queue.get(&id).unwrap().unwrap().error.as_deref(), Some("boom"));

    pool.shutdown().await;
}

#[tokio::test]
async fn missing_handler_fails_job() {
    let queue = Arc::new(AsyncQueue::new(Arc::new(Engine::in_memory()), FakeClock::new()));
    let registry = Arc::new(HandlerRegistry::new());

    let pool = WorkerPool::spawn(queue.clone(), registry, 1);

    let job = Job::builder().handler_name("no-such-handler").source("s").build();
    let id = queue.enqueue(job).unwrap();

    wait_until(|| queue.get(&id).unwrap().unwrap().status == JobStatus::Failed).await;

    pool.shutdown().await;
}
