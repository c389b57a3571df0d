// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Plugin proxy handler: bridges `qntx_worker::Handler` to a plugin's
//! `ExecuteJob` RPC (spec §4.E "Plugin proxy handler").

use async_trait::async_trait;
use qntx_core::Job;
use qntx_transport::{PluginClient, DEFAULT_EXECUTE_JOB_TIMEOUT_SECS};
use qntx_worker::{Handler, HandlerOutcome};
use tokio_util::sync::CancellationToken;

use crate::registry::Registry;

/// For any `handler_name` a plugin claims, the worker pool registers one
/// of these. `execute()` looks up the plugin's current address in the
/// registry (rather than caching it) so a restarted plugin with a new
/// port is picked up without re-registering the handler.
pub struct ProxyHandler {
    handler_name: String,
    plugin_name: String,
    registry: std::sync::Arc<Registry>,
    timeout_secs: u64,
}

impl ProxyHandler {
    pub fn new(handler_name: impl Into<String>, plugin_name: impl Into<String>, registry: std::sync::Arc<Registry>) -> Self {
        Self {
            handler_name: handler_name.into(),
            plugin_name: plugin_name.into(),
            registry,
            timeout_secs: DEFAULT_EXECUTE_JOB_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[async_trait]
impl Handler for ProxyHandler {
    fn name(&self) -> &str {
        &self.handler_name
    }

    async fn execute(&self, _ctx: &CancellationToken, job: &Job) -> Result<HandlerOutcome, String> {
        let entry = self
            .registry
            .get(&self.plugin_name)
            .ok_or_else(|| format!("plugin '{}' not registered", self.plugin_name))?;
        let process_info = entry
            .process_info
            .ok_or_else(|| format!("plugin '{}' has no process info (not out-of-process?)", self.plugin_name))?;

        let client = PluginClient::new(process_info.addr, process_info.auth_token);
        let result = client
            .execute_job(job.id, self.handler_name.clone(), job.payload.clone(), self.timeout_secs)
            .await
            .map_err(|error| error.to_string())?;

        if !result.success {
            return Err(result.error.unwrap_or_else(|| "plugin job execution failed".to_string()));
        }

        Ok(HandlerOutcome { progress: result.progress, cost_actual: result.cost_actual })
    }
}

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;
