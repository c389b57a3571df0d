// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use std::sync::Arc;

use qntx_core::{JobBuilder, PluginCapabilities, PluginMetadata, ProcessInfo};
use qntx_transport::{ExecuteJobResult, RpcRequest, RpcResponse};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use super::*;

async fn spawn_fake_plugin(token: &'static str, response: RpcResponse) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let envelope: qntx_transport::Envelope<RpcRequest> =
            qntx_transport::wire::read_json(&mut stream).await.unwrap();
        assert_eq!(envelope.token, token);
        qntx_transport::wire::write_json(&mut stream, &response).await.unwrap();
    });
    addr
}

fn registered(registry: &Registry, name: &str, addr: std::net::SocketAddr, token: &str) {
    registry
        .register(
            PluginMetadata { name: name.to_string(), version: "1.0.0".to_string(), description: String::new(), required_host_version: None },
            PluginCapabilities::default(),
            "1.0.0",
        )
        .unwrap();
    registry.set_process_info(name, ProcessInfo { addr, pid: 1, auth_token: token.to_string() }).unwrap();
}

#[tokio::test]
async fn successful_execution_writes_back_progress_and_cost() {
    let result = ExecuteJobResult {
        success: true,
        error: None,
        progress: Some(qntx_core::Progress { current: 1, total: 2 }),
        cost_actual: Some(0.5),
    };
    let addr = spawn_fake_plugin("tok", RpcResponse::ExecuteJob(result.clone())).await;

    let registry = Arc::new(Registry::new());
    registered(&registry, "fetch-plugin", addr, "tok");

    let handler = ProxyHandler::new("fetch.run", "fetch-plugin", registry);
    let job = JobBuilder::new().handler_name("fetch.run").build();
    let outcome = handler.execute(&CancellationToken::new(), &job).await.unwrap();
    assert_eq!(outcome.progress, result.progress);
    assert_eq!(outcome.cost_actual, result.cost_actual);
}

#[tokio::test]
async fn failed_execution_surfaces_the_plugin_error_message() {
    let result = ExecuteJobResult { success: false, error: Some("boom".to_string()), progress: None, cost_actual: None };
    let addr = spawn_fake_plugin("tok", RpcResponse::ExecuteJob(result)).await;

    let registry = Arc::new(Registry::new());
    registered(&registry, "fetch-plugin", addr, "tok");

    let handler = ProxyHandler::new("fetch.run", "fetch-plugin", registry);
    let job = JobBuilder::new().handler_name("fetch.run").build();
    let err = handler.execute(&CancellationToken::new(), &job).await.unwrap_err();
    assert_eq!(err, "boom");
}

#[tokio::test]
async fn unregistered_plugin_fails_without_a_network_call() {
    let registry = Arc::new(Registry::new());
    let handler = ProxyHandler::new("fetch.run", "missing-plugin", registry);
    let job = JobBuilder::new().handler_name("fetch.run").build();
    let err = handler.execute(&CancellationToken::new(), &job).await.unwrap_err();
    assert!(err.contains("not registered"));
}
