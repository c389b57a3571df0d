// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Composition root: wires the persistence adapter, async queue, worker
//! pool, plugin registry/supervisor, and Pulse ticker into one running
//! process (spec §2, §4.E plugin launch sequence).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use qntx_core::{PluginState, SystemClock};
use qntx_plugin::{Registry, Supervisor};
use qntx_queue::AsyncQueue;
use qntx_storage::Engine;
use qntx_transport::{PluginClient, ServiceEndpoints};
use qntx_worker::{HandlerRegistry, SystemMetricsSampler, WorkerPool};
use tokio::process::Child;

use crate::config::Config;

/// Default timeout for the one-shot lifecycle RPCs (metadata/initialize/
/// shutdown) — these are local-process round trips, not job execution.
const LIFECYCLE_RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// A launched plugin process kept around so it can be asked to shut down.
struct RunningPlugin {
    name: String,
    client: PluginClient,
    child: Child,
}

/// The booted host process: every live component plus what's needed to
/// shut it all down in order.
pub struct App {
    pub store: Arc<Engine>,
    pub queue: Arc<AsyncQueue<Engine, SystemClock>>,
    pub handler_registry: Arc<HandlerRegistry>,
    pub plugin_registry: Arc<Registry>,
    worker_pool: Option<WorkerPool>,
    /// Kept in launch (ascending name) order; reversed at shutdown.
    plugins: Vec<RunningPlugin>,
}

impl App {
    /// Boots every component and launches the configured plugin fleet in
    /// lexicographic order (spec §4.E, §5).
    pub async fn boot(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.state_dir)?;
        let store = Arc::new(Engine::open(config.state_dir.join("store"))?);
        let queue = Arc::new(AsyncQueue::new(store.clone(), SystemClock));
        let handler_registry = Arc::new(HandlerRegistry::new());
        let plugin_registry = Arc::new(Registry::new());

        let supervisor = Supervisor::new().with_search_paths(config.plugin_paths.clone());
        let plugins_config_dir = plugin_config_dir(config);

        let mut enabled: Vec<String> = config.plugin_enabled.clone();
        enabled.sort();

        let mut plugins = Vec::new();
        for name in &enabled {
            match launch_one(
                &supervisor,
                &plugin_registry,
                &handler_registry,
                &plugins_config_dir,
                name,
                &config.host_version,
            )
            .await
            {
                Ok(running) => plugins.push(running),
                Err(error) => {
                    tracing::warn!(plugin = %name, %error, "plugin failed to launch, continuing without it");
                    let _ = plugin_registry.set_state(name, PluginState::Failed);
                }
            }
        }

        let worker_pool = Some(WorkerPool::spawn(queue.clone(), handler_registry.clone(), config.pulse_worker_count));

        Ok(Self { store, queue, handler_registry, plugin_registry, worker_pool, plugins })
    }

    pub fn metrics(&self) -> SystemMetricsSampler {
        self.worker_pool.as_ref().map(|pool| pool.metrics().clone()).unwrap_or_else(|| SystemMetricsSampler::new(0))
    }

    /// Looks up the RPC client for a launched plugin by name (spec §6.3 HTTP
    /// proxy/health routes).
    pub(crate) fn client_for(&self, name: &str) -> Option<&PluginClient> {
        self.plugins.iter().find(|running| running.name == name).map(|running| &running.client)
    }

    /// Stops workers, shuts down every plugin in reverse-lexicographic
    /// order, and checkpoints the store (spec §4.E shutdown ordering).
    pub async fn shutdown(mut self) {
        if let Some(pool) = self.worker_pool.take() {
            pool.shutdown().await;
        }

        for running in self.plugins.drain(..).rev() {
            if let Err(error) = running.client.shutdown(LIFECYCLE_RPC_TIMEOUT).await {
                tracing::warn!(plugin = %running.name, %error, "plugin shutdown RPC failed");
            }
            let _ = self.plugin_registry.set_state(&running.name, PluginState::Stopped);
            // `child` was spawned with `kill_on_drop(true)`; dropping it here
            // reaps the process if it hasn't already exited on its own.
            drop(running.child);
        }

        if let Err(error) = self.store.checkpoint() {
            tracing::error!(%error, "final checkpoint failed");
        }
    }

    /// Builds an `App` with no launched plugin processes, for exercising
    /// registry-driven routing logic (e.g. [`crate::http`]) without spawning
    /// anything.
    #[cfg(test)]
    pub(crate) fn for_routing_tests() -> Self {
        Self {
            store: Arc::new(Engine::in_memory()),
            queue: Arc::new(AsyncQueue::new(Arc::new(Engine::in_memory()), SystemClock)),
            handler_registry: Arc::new(HandlerRegistry::new()),
            plugin_registry: Arc::new(Registry::new()),
            worker_pool: None,
            plugins: Vec::new(),
        }
    }
}

/// Launches one plugin, registers it, and wires a [`qntx_plugin::ProxyHandler`]
/// for every handler name it claims.
///
/// The transport contract has no RPC enumerating a plugin's handler names;
/// they are read from the `handlers` key of its per-plugin config file
/// (comma-separated), defaulting to a single handler named after the
/// plugin itself when that key is absent.
async fn launch_one(
    supervisor: &Supervisor,
    registry: &Arc<Registry>,
    handler_registry: &HandlerRegistry,
    plugins_config_dir: &std::path::Path,
    name: &str,
    host_version: &str,
) -> anyhow::Result<RunningPlugin> {
    let launched = supervisor.launch(name).await?;
    let client = PluginClient::new(launched.process_info.addr, launched.process_info.auth_token.clone());

    let (metadata, capabilities) = client.metadata(LIFECYCLE_RPC_TIMEOUT).await?;
    registry.register(metadata.clone(), capabilities, host_version)?;
    registry.set_process_info(&metadata.name, launched.process_info.clone())?;

    let flat_config = crate::config::load_plugin_config(plugins_config_dir, name)?;
    let handlers: Vec<String> =
        flat_config.get("handlers").map(|v| split_csv(v)).unwrap_or_else(|| vec![metadata.name.clone()]);

    let endpoints = ServiceEndpoints { services_addr: launched.process_info.addr };
    client.initialize(endpoints, flat_config, LIFECYCLE_RPC_TIMEOUT).await?;
    registry.set_state(&metadata.name, PluginState::Running)?;

    for handler_name in handlers {
        handler_registry.register(Arc::new(qntx_plugin::ProxyHandler::new(
            handler_name,
            metadata.name.clone(),
            registry.clone(),
        )));
    }

    Ok(RunningPlugin { name: metadata.name, client, child: launched.child })
}

fn split_csv(value: &str) -> Vec<String> {
    value.split(',').map(|part| part.trim().to_string()).filter(|part| !part.is_empty()).collect()
}

fn plugin_config_dir(config: &Config) -> PathBuf {
    config.plugin_paths.first().cloned().unwrap_or_else(|| config.state_dir.join("plugins"))
}
