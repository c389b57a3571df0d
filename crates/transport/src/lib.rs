// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qntx-transport: the host-side RPC client for plugin processes (spec
//! §4.E, §6.2). Wire format is length-prefixed JSON, matching the
//! teacher's own documented IPC framing applied to the plugin surface
//! instead of daemon/CLI IPC.

pub mod auth;
pub mod client;
pub mod error;
pub mod http_proxy;
pub mod message;
pub mod wire;

pub use client::{PluginClient, DEFAULT_EXECUTE_JOB_TIMEOUT_SECS};
pub use error::TransportError;
pub use http_proxy::{proxy_http, strip_plugin_prefix};
pub use message::{
    Envelope, ExecuteJobResult, HealthStatus, HttpRequest, HttpResponse, RpcRequest, RpcResponse,
    ServiceEndpoints,
};
