// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Routes the HTTP surface named in spec §6.3 to a plugin, `/plugins`, or
//! `/plugins/{name}/health`. A plain function over [`App`]'s state, not
//! bound to any listener — wiring an actual HTTP server is left to an
//! external crate (spec §1, "web UI" out of scope).

use std::time::Duration;

use qntx_transport::{proxy_http, strip_plugin_prefix, HttpResponse};

use crate::app::App;

const ROUTE_TIMEOUT: Duration = Duration::from_secs(30);

impl App {
    /// Routes one HTTP request per spec §6.3.
    pub async fn route_http(
        &self,
        method: impl Into<String>,
        path: &str,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    ) -> HttpResponse {
        if path == "/plugins" {
            return self.list_plugins_response();
        }
        if let Some(name) = path.strip_prefix("/plugins/").and_then(|rest| rest.strip_suffix("/health")) {
            return self.plugin_health_response(name).await;
        }
        if let Some((plugin_name, rest)) = strip_plugin_prefix(path) {
            return self.proxy_to_plugin(plugin_name, method.into(), rest, headers, body).await;
        }
        not_found()
    }

    fn list_plugins_response(&self) -> HttpResponse {
        #[derive(serde::Serialize)]
        struct PluginSummary {
            name: String,
            version: String,
            state: qntx_core::PluginState,
        }

        let summaries: Vec<PluginSummary> = self
            .plugin_registry
            .list()
            .into_iter()
            .map(|entry| PluginSummary { name: entry.metadata.name, version: entry.metadata.version, state: entry.state })
            .collect();

        json_response(200, &summaries)
    }

    async fn plugin_health_response(&self, name: &str) -> HttpResponse {
        if !self.plugin_registry.is_ready(name) {
            return json_response(503, &serde_json::json!({ "healthy": false, "message": "plugin not ready" }));
        }
        let Some(client) = self.client_for(name) else {
            return json_response(503, &serde_json::json!({ "healthy": false, "message": "plugin not registered" }));
        };
        match client.health(ROUTE_TIMEOUT).await {
            Ok(status) => json_response(200, &status),
            Err(error) => json_response(502, &serde_json::json!({ "healthy": false, "message": error.to_string() })),
        }
    }

    async fn proxy_to_plugin(
        &self,
        plugin_name: &str,
        method: String,
        path: &str,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    ) -> HttpResponse {
        if !self.plugin_registry.is_ready(plugin_name) {
            return HttpResponse { status: 503, headers: Vec::new(), body: b"plugin not ready".to_vec() };
        }
        let Some(client) = self.client_for(plugin_name) else {
            return not_found();
        };
        match proxy_http(client, method, path, headers, body, ROUTE_TIMEOUT).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(plugin = %plugin_name, %error, "plugin HTTP proxy call failed");
                HttpResponse { status: 502, headers: Vec::new(), body: error.to_string().into_bytes() }
            }
        }
    }
}

fn json_response(status: u16, value: &impl serde::Serialize) -> HttpResponse {
    let body = serde_json::to_vec(value).unwrap_or_else(|_| b"{}".to_vec());
    HttpResponse { status, headers: vec![("content-type".to_string(), "application/json".to_string())], body }
}

fn not_found() -> HttpResponse {
    HttpResponse { status: 404, headers: Vec::new(), body: b"not found".to_vec() }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
