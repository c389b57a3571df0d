// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Plugin registration and lifecycle state (spec §4.E).

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use qntx_core::{check_compatible, PluginCapabilities, PluginMetadata, PluginState, ProcessInfo};

use crate::error::PluginError;

/// Everything the registry tracks about one plugin.
#[derive(Debug, Clone)]
pub struct PluginEntry {
    pub metadata: PluginMetadata,
    pub capabilities: PluginCapabilities,
    pub state: PluginState,
    pub process_info: Option<ProcessInfo>,
}

/// Reader-writer-locked plugin map, keyed by name. A `BTreeMap` gives
/// `initialize_all`/`shutdown_all` their required lexicographic order for
/// free (spec §5 ordering guarantees).
#[derive(Default)]
pub struct Registry {
    plugins: RwLock<BTreeMap<String, PluginEntry>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin in `loading` state, rejecting duplicate names
    /// and incompatible host-version constraints.
    pub fn register(
        &self,
        metadata: PluginMetadata,
        capabilities: PluginCapabilities,
        host_version: &str,
    ) -> Result<(), PluginError> {
        check_compatible(metadata.required_host_version.as_deref(), host_version)?;

        let mut plugins = self.plugins.write();
        if plugins.contains_key(&metadata.name) {
            return Err(PluginError::DuplicateName(metadata.name));
        }
        let name = metadata.name.clone();
        plugins.insert(
            name,
            PluginEntry { metadata, capabilities, state: PluginState::Loading, process_info: None },
        );
        Ok(())
    }

    pub fn is_ready(&self, name: &str) -> bool {
        self.plugins.read().get(name).is_some_and(|p| p.state.is_ready())
    }

    pub fn get(&self, name: &str) -> Option<PluginEntry> {
        self.plugins.read().get(name).cloned()
    }

    /// Snapshot of every registered plugin, taken under a single read lock
    /// so batch operations can run lock-free against the copy.
    pub fn list(&self) -> Vec<PluginEntry> {
        self.plugins.read().values().cloned().collect()
    }

    pub fn set_state(&self, name: &str, state: PluginState) -> Result<(), PluginError> {
        let mut plugins = self.plugins.write();
        let entry = plugins.get_mut(name).ok_or_else(|| PluginError::NotFound(name.to_string()))?;
        entry.state = state;
        Ok(())
    }

    pub fn set_process_info(&self, name: &str, info: ProcessInfo) -> Result<(), PluginError> {
        let mut plugins = self.plugins.write();
        let entry = plugins.get_mut(name).ok_or_else(|| PluginError::NotFound(name.to_string()))?;
        entry.process_info = Some(info);
        Ok(())
    }

    /// `running -> paused`, only for plugins that advertise `pausable`.
    pub fn pause(&self, name: &str) -> Result<(), PluginError> {
        let mut plugins = self.plugins.write();
        let entry = plugins.get_mut(name).ok_or_else(|| PluginError::NotFound(name.to_string()))?;
        if !entry.capabilities.pausable {
            return Err(PluginError::NotPausable(name.to_string()));
        }
        if entry.state != PluginState::Running {
            return Err(PluginError::InvalidTransition { name: name.to_string(), action: "pause", current: entry.state });
        }
        entry.state = PluginState::Paused;
        Ok(())
    }

    pub fn resume(&self, name: &str) -> Result<(), PluginError> {
        let mut plugins = self.plugins.write();
        let entry = plugins.get_mut(name).ok_or_else(|| PluginError::NotFound(name.to_string()))?;
        if entry.state != PluginState::Paused {
            return Err(PluginError::InvalidTransition { name: name.to_string(), action: "resume", current: entry.state });
        }
        entry.state = PluginState::Running;
        Ok(())
    }

    /// Initializes every plugin in ascending name order via `init`. A
    /// failure marks that plugin `failed` and the loop continues — partial
    /// fleets are expected (spec §4.E).
    pub fn initialize_all<F>(&self, mut init: F)
    where
        F: FnMut(&str) -> Result<(), String>,
    {
        let names: Vec<String> = self.plugins.read().keys().cloned().collect();
        for name in names {
            match init(&name) {
                Ok(()) => {
                    let _ = self.set_state(&name, PluginState::Running);
                }
                Err(message) => {
                    tracing::warn!(plugin = %name, %message, "plugin initialization failed");
                    let _ = self.set_state(&name, PluginState::Failed);
                }
            }
        }
    }

    /// Shuts down every plugin in descending name order via `shutdown`,
    /// collecting every error rather than stopping at the first (spec §4.E).
    pub fn shutdown_all<F>(&self, mut shutdown: F) -> Result<(), PluginError>
    where
        F: FnMut(&str) -> Result<(), String>,
    {
        let names: Vec<String> = self.plugins.read().keys().rev().cloned().collect();
        let mut errors = Vec::new();
        for name in names {
            match shutdown(&name) {
                Ok(()) => {
                    let _ = self.set_state(&name, PluginState::Stopped);
                }
                Err(message) => {
                    errors.push(format!("{name}: {message}"));
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PluginError::ShutdownFailed { count: errors.len(), messages: errors })
        }
    }

    /// Runs `health` against every plugin, returning `(name, healthy)`
    /// pairs in registration order.
    pub fn health_check_all<F>(&self, mut health: F) -> Vec<(String, bool)>
    where
        F: FnMut(&str) -> bool,
    {
        let names: Vec<String> = self.plugins.read().keys().cloned().collect();
        names.into_iter().map(|name| { let healthy = health(&name); (name, healthy) }).collect()
    }
}

static DEFAULT_REGISTRY: OnceLock<Arc<Registry>> = OnceLock::new();

/// Installs the process-wide default registry. Panics if called twice —
/// there is exactly one host per process, so a second call is a
/// programmer error (spec §3.2), not a recoverable condition.
#[allow(clippy::panic)]
pub fn set_default(registry: Arc<Registry>) {
    if DEFAULT_REGISTRY.set(registry).is_err() {
        panic!("default plugin registry already set");
    }
}

pub fn get_default() -> Option<Arc<Registry>> {
    DEFAULT_REGISTRY.get().cloned()
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
