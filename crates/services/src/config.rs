// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Typed configuration lookup exposed to plugins (spec §4.E, §6.1 per-plugin
//! TOML config file, delivered as a flat string map).

use crate::error::ServiceError;

/// String-keyed configuration surface. Backed by the flat map parsed from
/// a plugin's `~/.qntx/plugins/{name}.toml` file (spec §6.1) — this is not
/// a general layered config loader, only typed access to that one map.
pub trait ServiceConfig: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;

    fn get_int(&self, key: &str) -> Result<Option<i64>, ServiceError> {
        match self.get_string(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| ServiceError::WrongConfigType { key: key.to_string(), expected: "int" }),
        }
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, ServiceError> {
        match self.get_string(key) {
            None => Ok(None),
            Some(raw) => match raw.as_str() {
                "true" | "1" => Ok(Some(true)),
                "false" | "0" => Ok(Some(false)),
                _ => Err(ServiceError::WrongConfigType { key: key.to_string(), expected: "bool" }),
            },
        }
    }

    /// A comma-separated value split into parts, trimmed of whitespace.
    fn get_slice(&self, key: &str) -> Option<Vec<String>> {
        self.get_string(key).map(|raw| raw.split(',').map(|part| part.trim().to_string()).collect())
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        self.get_string(key)
    }

    fn require_string(&self, key: &str) -> Result<String, ServiceError> {
        self.get_string(key).ok_or_else(|| ServiceError::MissingConfig(key.to_string()))
    }
}

/// In-memory `ServiceConfig` over an already-parsed string map — what the
/// host hands a plugin after parsing its `.toml` config file.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig(std::collections::HashMap<String, String>);

impl StaticConfig {
    pub fn new(map: std::collections::HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl ServiceConfig for StaticConfig {
    fn get_string(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}
