// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use async_trait::async_trait;
use qntx_core::Job;
use tokio_util::sync::CancellationToken;

use super::*;

struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
    fn name(&self) -> &str {
        "echo"
    }

    async fn execute(&self, _ctx: &CancellationToken, _job: &Job) -> Result<HandlerOutcome, String> {
        Ok(HandlerOutcome::default())
    }
}

#[test]
fn register_then_get_round_trips() {
    let registry = HandlerRegistry::new();
    registry.register(Arc::new(EchoHandler));
    assert!(registry.get("echo").is_some());
    assert!(registry.get("missing").is_none());
}

#[test]
fn unregister_removes_handler() {
    let registry = HandlerRegistry::new();
    registry.register(Arc::new(EchoHandler));
    registry.unregister("echo");
    assert!(registry.get("echo").is_none());
}

#[tokio::test]
async fn echo_handler_executes() {
    let handler = EchoHandler;
    let ctx = CancellationToken::new();
    let job = Job::builder().handler_name("echo").build();
    let outcome = handler.execute(&ctx, &job).await.unwrap();
    assert!(outcome.progress.is_none());
}
