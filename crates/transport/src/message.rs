// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! RPC message types for the plugin transport (spec §4.E, §6.2).
//!
//! Every call is wrapped in an [`Envelope`] carrying the bearer token the
//! receiver must verify (constant-time, see [`crate::auth::tokens_match`])
//! before acting on the inner [`RpcRequest`].

use std::collections::HashMap;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use qntx_core::{JobId, PluginCapabilities, PluginMetadata, Progress};

/// Host callback addresses injected into a plugin at `Initialize` time, so
/// it can call back into the service bridge (spec §4.E "service bridge").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceEndpoints {
    /// Address of the host's service bridge RPC listener.
    pub services_addr: SocketAddr,
}

/// An HTTP request forwarded to a plugin's `HandleHTTP` RPC (spec §4.E,
/// §6.3). Headers are an ordered list rather than a map so repeated
/// header names survive the round trip bit-faithfully.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    /// Path with the `/api/{plugin}` prefix already stripped.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// An HTTP response mirrored back from a plugin's `HandleHTTP` RPC.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Result of `Health()` (spec §4.E, §6.3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub healthy: bool,
    pub message: String,
    pub details: serde_json::Value,
}

/// Result of `ExecuteJob(...)` (spec §4.E): success flag, optional error,
/// optional progress, optional actual cost — written back onto the `Job`
/// by the proxy handler before it returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExecuteJobResult {
    pub success: bool,
    pub error: Option<String>,
    pub progress: Option<Progress>,
    pub cost_actual: Option<f64>,
}

/// One request on the plugin RPC surface (spec §4.E "Transport contract").
/// `HandleWS` is represented as raw opaque frames — the core does not
/// interpret streaming payloads, only plugins and their declared handlers
/// do (spec §1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RpcRequest {
    Metadata,
    Initialize { endpoints: ServiceEndpoints, config: HashMap<String, String> },
    Shutdown,
    Health,
    HandleHttp(HttpRequest),
    HandleWs(Vec<u8>),
    ExecuteJob { job_id: JobId, handler_name: String, payload: Vec<u8>, timeout_secs: u64 },
    Pause,
    Resume,
}

impl RpcRequest {
    /// Short name for logging, matching the RPC names in spec §4.E's table.
    pub fn kind(&self) -> &'static str {
        match self {
            RpcRequest::Metadata => "Metadata",
            RpcRequest::Initialize { .. } => "Initialize",
            RpcRequest::Shutdown => "Shutdown",
            RpcRequest::Health => "Health",
            RpcRequest::HandleHttp(_) => "HandleHTTP",
            RpcRequest::HandleWs(_) => "HandleWS",
            RpcRequest::ExecuteJob { .. } => "ExecuteJob",
            RpcRequest::Pause => "Pause",
            RpcRequest::Resume => "Resume",
        }
    }
}

/// Reply to an [`RpcRequest`]. `Error` is a distinct variant rather than an
/// outer `Result` so it can travel through the same length-prefixed JSON
/// frame as every successful reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RpcResponse {
    Metadata { metadata: PluginMetadata, capabilities: PluginCapabilities },
    Initialized,
    ShutdownAck,
    Health(HealthStatus),
    HandleHttp(HttpResponse),
    HandleWs(Vec<u8>),
    ExecuteJob(ExecuteJobResult),
    Paused,
    Resumed,
    Error(String),
}

/// Wire envelope: every RPC call and reply carries the bearer token the
/// receiver compares with constant-time equality (spec §4.E).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub token: String,
    pub body: T,
}

impl<T> Envelope<T> {
    pub fn new(token: impl Into<String>, body: T) -> Self {
        Self { token: token.into(), body }
    }
}
