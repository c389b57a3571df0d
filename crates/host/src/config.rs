// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! The narrow configuration surface the core needs to boot (spec §6.5).
//!
//! This is deliberately not a general layered config loader (that remains
//! out of scope, spec §1) — it parses exactly the keys named in §6.5 from
//! an optional TOML file, with `QNTX_*` environment overrides in the style
//! of `oj-daemon::env`, plus the per-plugin flat config files (§6.1).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
const DEFAULT_RETENTION_DAYS: u32 = 90;
const DEFAULT_WORKER_COUNT: usize = 4;

/// Resolved configuration for `qntxd` (spec §6.5).
#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub plugin_enabled: Vec<String>,
    pub plugin_paths: Vec<PathBuf>,
    pub pulse_tick_interval: Duration,
    pub pulse_execution_retention_days: u32,
    pub pulse_worker_count: usize,
    pub host_version: String,
}

impl Config {
    /// Loads the config file at [`config_path`] if it exists, applies
    /// `QNTX_*` environment overrides, and fills in the spec-mandated
    /// defaults for anything still unset.
    pub fn load() -> Result<Self, ConfigError> {
        let state_dir = state_dir()?;
        let path = config_path(&state_dir);

        let raw = if path.exists() {
            let text =
                std::fs::read_to_string(&path).map_err(|source| ConfigError::Read { path: display(&path), source })?;
            toml::from_str::<RawConfig>(&text)
                .map_err(|source| ConfigError::Parse { path: display(&path), source })?
        } else {
            RawConfig::default()
        };

        let mut plugin_enabled = raw.plugin.enabled;
        if let Ok(value) = std::env::var("QNTX_PLUGIN_ENABLED") {
            plugin_enabled = split_csv(&value);
        }

        let mut plugin_paths: Vec<PathBuf> = raw.plugin.paths.into_iter().map(PathBuf::from).collect();
        if let Ok(value) = std::env::var("QNTX_PLUGIN_PATHS") {
            plugin_paths = split_csv(&value).into_iter().map(PathBuf::from).collect();
        }

        let pulse_tick_interval = std::env::var("QNTX_PULSE_TICK_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(raw.pulse.tick_interval_ms)
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_millis(DEFAULT_TICK_INTERVAL_MS));

        let pulse_execution_retention_days = std::env::var("QNTX_PULSE_RETENTION_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(raw.pulse.execution_retention_days)
            .unwrap_or(DEFAULT_RETENTION_DAYS);

        let pulse_worker_count = std::env::var("QNTX_PULSE_WORKER_COUNT")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(raw.pulse.worker_count)
            .unwrap_or(DEFAULT_WORKER_COUNT);

        let host_version =
            std::env::var("QNTX_HOST_VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

        Ok(Self {
            state_dir,
            plugin_enabled,
            plugin_paths,
            pulse_tick_interval,
            pulse_execution_retention_days,
            pulse_worker_count,
            host_version,
        })
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join("qntxd.log")
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    plugin: RawPlugin,
    #[serde(default)]
    pulse: RawPulse,
}

#[derive(Debug, Default, Deserialize)]
struct RawPlugin {
    #[serde(default)]
    enabled: Vec<String>,
    #[serde(default)]
    paths: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPulse {
    tick_interval_ms: Option<u64>,
    execution_retention_days: Option<u32>,
    worker_count: Option<usize>,
}

/// Resolve state directory: `QNTX_STATE_DIR` > `XDG_STATE_HOME/qntx` >
/// `~/.local/state/qntx`.
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("QNTX_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("qntx"));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".local/state/qntx"))
}

fn config_path(state_dir: &std::path::Path) -> PathBuf {
    std::env::var("QNTX_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| state_dir.join("config.toml"))
}

fn split_csv(value: &str) -> Vec<String> {
    value.split(',').map(|part| part.trim().to_string()).filter(|part| !part.is_empty()).collect()
}

fn display(path: &std::path::Path) -> String {
    path.display().to_string()
}

/// Loads a plugin's optional `~/.qntx/plugins/{name}.toml` as a flat string
/// map (spec §6.1), delivered verbatim in `Initialize.config`. A missing
/// file yields an empty map rather than an error — per-plugin config is
/// optional.
pub fn load_plugin_config(dir: &std::path::Path, name: &str) -> Result<HashMap<String, String>, ConfigError> {
    let path = dir.join(format!("{name}.toml"));
    if !path.is_file() {
        return Ok(HashMap::new());
    }
    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read { path: display(&path), source })?;
    let table: toml::Value =
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: display(&path), source })?;
    let Some(table) = table.as_table() else {
        return Ok(HashMap::new());
    };
    let mut flat = HashMap::new();
    for (key, value) in table {
        let rendered = match value {
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            other => other.to_string(),
        };
        flat.insert(key.clone(), rendered);
    }
    Ok(flat)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
