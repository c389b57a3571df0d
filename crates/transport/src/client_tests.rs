// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use std::time::Duration;

use qntx_core::{PluginMetadata, Progress};
use tokio::net::TcpListener;

use super::*;
use crate::message::Envelope;
use crate::wire::{read_json, write_json};

const TEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Spawns a one-shot fake plugin: accepts a single connection, reads the
/// envelope, and replies with `response` only if the token matches
/// `expected_token` (otherwise replies with an `Error`).
async fn spawn_fake_plugin(expected_token: &'static str, response: RpcResponse) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let envelope: Envelope<RpcRequest> = read_json(&mut stream).await.unwrap();
        let reply = if crate::auth::tokens_match(expected_token, &envelope.token) {
            response
        } else {
            RpcResponse::Error("unauthorized".to_string())
        };
        write_json(&mut stream, &reply).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn metadata_round_trips_through_the_wire() {
    let metadata = PluginMetadata {
        name: "fetch".to_string(),
        version: "1.0.0".to_string(),
        description: "fetches things".to_string(),
        required_host_version: None,
    };
    let response = RpcResponse::Metadata { metadata: metadata.clone(), capabilities: qntx_core::PluginCapabilities::default() };
    let addr = spawn_fake_plugin("tok-123", response).await;

    let client = PluginClient::new(addr, "tok-123");
    let (returned, _caps) = client.metadata(TEST_TIMEOUT).await.unwrap();
    assert_eq!(returned.name, metadata.name);
}

#[tokio::test]
async fn mismatched_token_surfaces_as_plugin_error() {
    let addr = spawn_fake_plugin("right-token", RpcResponse::Health(HealthStatus {
        healthy: true,
        message: String::new(),
        details: serde_json::Value::Null,
    }))
    .await;

    let client = PluginClient::new(addr, "wrong-token");
    let err = client.health(TEST_TIMEOUT).await.unwrap_err();
    assert!(matches!(err, TransportError::PluginError(_)));
}

#[tokio::test]
async fn execute_job_writes_back_progress_and_cost() {
    let result = ExecuteJobResult {
        success: true,
        error: None,
        progress: Some(Progress { current: 3, total: 10 }),
        cost_actual: Some(0.42),
    };
    let addr = spawn_fake_plugin("tok", RpcResponse::ExecuteJob(result.clone())).await;

    let client = PluginClient::new(addr, "tok");
    let job_id = qntx_core::JobId::new();
    let returned = client.execute_job(job_id, "python.script", b"{}".to_vec(), 30).await.unwrap();
    assert_eq!(returned, result);
}

#[tokio::test]
async fn handle_http_mirrors_status_and_body() {
    let response = HttpResponse {
        status: 200,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: b"{\"ok\":true}".to_vec(),
    };
    let addr = spawn_fake_plugin("tok", RpcResponse::HandleHttp(response.clone())).await;

    let client = PluginClient::new(addr, "tok");
    let request = HttpRequest { method: "GET".to_string(), path: "/books".to_string(), headers: vec![], body: vec![] };
    let returned = client.handle_http(request, TEST_TIMEOUT).await.unwrap();
    assert_eq!(returned, response);
}

#[tokio::test]
async fn unreachable_address_surfaces_as_io_error() {
    // Port 0 is never a valid connect target; nothing is listening.
    let client = PluginClient::new("127.0.0.1:1".parse().unwrap(), "tok");
    let err = client.health(Duration::from_millis(500)).await.unwrap_err();
    assert!(matches!(err, TransportError::Io(_) | TransportError::TimedOut { .. }));
}
