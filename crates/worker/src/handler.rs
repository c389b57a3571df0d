// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Handler contract and registry (spec §4.C).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use qntx_core::{Job, Progress};
use tokio_util::sync::CancellationToken;

/// Optional progress/cost updates a handler wants merged back onto the job
/// before it is marked `completed`.
#[derive(Debug, Clone, Default)]
pub struct HandlerOutcome {
    pub progress: Option<Progress>,
    pub cost_actual: Option<f64>,
}

/// A unit of domain logic the worker pool dispatches queued jobs to.
///
/// Domain-specific handlers are typically plugin proxies (spec §4.E); this
/// crate only depends on the contract, never on `qntx-transport`.
#[async_trait]
pub trait Handler: Send + Sync {
    fn name(&self) -> &str;

    async fn execute(&self, ctx: &CancellationToken, job: &Job) -> Result<HandlerOutcome, String>;
}

/// Lookup table from handler name to implementation.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn Handler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handler: Arc<dyn Handler>) {
        self.handlers.write().insert(handler.name().to_string(), handler);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.read().get(name).cloned()
    }

    pub fn unregister(&self, name: &str) {
        self.handlers.write().remove(name);
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
