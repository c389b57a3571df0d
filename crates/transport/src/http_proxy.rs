// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! HTTP-over-RPC: forwards `/api/{plugin}/...` to a plugin's `HandleHTTP`
//! and mirrors the response back bit-faithfully (spec §4.E, §6.3).
//!
//! Exposed as a plain async function rather than bundling an HTTP server
//! dependency — wiring it to an actual listener is left to the host binary
//! (web UI / HTTP framework choice is out of scope, spec §1).

use std::time::Duration;

use crate::client::PluginClient;
use crate::error::TransportError;
use crate::message::{HttpRequest, HttpResponse};

/// Splits `/api/{plugin}/rest...` into `(plugin_name, "/rest...")`. Returns
/// `None` if `path` does not start with `/api/`.
pub fn strip_plugin_prefix(path: &str) -> Option<(&str, &str)> {
    let rest = path.strip_prefix("/api/")?;
    match rest.find('/') {
        Some(idx) => Some((&rest[..idx], &rest[idx..])),
        None => Some((rest, "/")),
    }
}

/// Forwards one HTTP request to `client` over the RPC transport and
/// returns the plugin's response unchanged (status, headers, body).
pub async fn proxy_http(
    client: &PluginClient,
    method: impl Into<String>,
    path: impl Into<String>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    timeout: Duration,
) -> Result<HttpResponse, TransportError> {
    let request = HttpRequest { method: method.into(), path: path.into(), headers, body };
    client.handle_http(request, timeout).await
}
