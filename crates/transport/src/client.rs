// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Host-side RPC client for a single out-of-process plugin (spec §4.E).
//!
//! Every call opens a fresh TCP connection, writes one length-prefixed
//! [`Envelope<RpcRequest>`], reads one length-prefixed [`RpcResponse`], and
//! closes. This mirrors the teacher's `RemoteCoopClient` request shape
//! (`http::post_authed`/`get_authed` per call, no persistent connection)
//! generalized from HTTP-over-Unix-socket to length-prefixed JSON-over-TCP.

use std::net::SocketAddr;
use std::time::Duration;

use qntx_core::JobId;
use tokio::net::TcpStream;

use crate::error::TransportError;
use crate::message::{
    Envelope, ExecuteJobResult, HealthStatus, HttpRequest, HttpResponse, RpcRequest, RpcResponse,
    ServiceEndpoints,
};
use crate::wire::{read_json, write_json};

/// Default `ExecuteJob` timeout, per spec §5.
pub const DEFAULT_EXECUTE_JOB_TIMEOUT_SECS: u64 = 300;

/// Client bound to one plugin's RPC address and bearer token.
#[derive(Debug, Clone)]
pub struct PluginClient {
    addr: SocketAddr,
    token: String,
}

impl PluginClient {
    pub fn new(addr: SocketAddr, token: impl Into<String>) -> Self {
        Self { addr, token: token.into() }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Sends one request and awaits its response, bounded by `timeout`.
    pub async fn call(&self, request: RpcRequest, timeout: Duration) -> Result<RpcResponse, TransportError> {
        let kind = request.kind();
        let fut = self.call_inner(request);
        match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(%kind, timeout_secs = timeout.as_secs(), "plugin RPC timed out");
                Err(TransportError::TimedOut { timeout_secs: timeout.as_secs() })
            }
        }
    }

    async fn call_inner(&self, request: RpcRequest) -> Result<RpcResponse, TransportError> {
        let mut stream = TcpStream::connect(self.addr).await?;
        let envelope = Envelope::new(self.token.clone(), request);
        write_json(&mut stream, &envelope).await?;
        let response: RpcResponse = read_json(&mut stream).await?;
        match response {
            RpcResponse::Error(message) => Err(TransportError::PluginError(message)),
            other => Ok(other),
        }
    }

    pub async fn metadata(&self, timeout: Duration) -> Result<(qntx_core::PluginMetadata, qntx_core::PluginCapabilities), TransportError> {
        match self.call(RpcRequest::Metadata, timeout).await? {
            RpcResponse::Metadata { metadata, capabilities } => Ok((metadata, capabilities)),
            _ => Err(TransportError::UnexpectedResponse),
        }
    }

    pub async fn initialize(
        &self,
        endpoints: ServiceEndpoints,
        config: std::collections::HashMap<String, String>,
        timeout: Duration,
    ) -> Result<(), TransportError> {
        match self.call(RpcRequest::Initialize { endpoints, config }, timeout).await? {
            RpcResponse::Initialized => Ok(()),
            _ => Err(TransportError::UnexpectedResponse),
        }
    }

    pub async fn shutdown(&self, timeout: Duration) -> Result<(), TransportError> {
        match self.call(RpcRequest::Shutdown, timeout).await? {
            RpcResponse::ShutdownAck => Ok(()),
            _ => Err(TransportError::UnexpectedResponse),
        }
    }

    pub async fn health(&self, timeout: Duration) -> Result<HealthStatus, TransportError> {
        match self.call(RpcRequest::Health, timeout).await? {
            RpcResponse::Health(status) => Ok(status),
            _ => Err(TransportError::UnexpectedResponse),
        }
    }

    pub async fn handle_http(&self, request: HttpRequest, timeout: Duration) -> Result<HttpResponse, TransportError> {
        match self.call(RpcRequest::HandleHttp(request), timeout).await? {
            RpcResponse::HandleHttp(response) => Ok(response),
            _ => Err(TransportError::UnexpectedResponse),
        }
    }

    pub async fn execute_job(
        &self,
        job_id: JobId,
        handler_name: impl Into<String>,
        payload: Vec<u8>,
        timeout_secs: u64,
    ) -> Result<ExecuteJobResult, TransportError> {
        let request = RpcRequest::ExecuteJob {
            job_id,
            handler_name: handler_name.into(),
            payload,
            timeout_secs,
        };
        match self.call(request, Duration::from_secs(timeout_secs)).await? {
            RpcResponse::ExecuteJob(result) => Ok(result),
            _ => Err(TransportError::UnexpectedResponse),
        }
    }

    pub async fn pause(&self, timeout: Duration) -> Result<(), TransportError> {
        match self.call(RpcRequest::Pause, timeout).await? {
            RpcResponse::Paused => Ok(()),
            _ => Err(TransportError::UnexpectedResponse),
        }
    }

    pub async fn resume(&self, timeout: Duration) -> Result<(), TransportError> {
        match self.call(RpcRequest::Resume, timeout).await? {
            RpcResponse::Resumed => Ok(()),
            _ => Err(TransportError::UnexpectedResponse),
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
