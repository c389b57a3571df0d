// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use qntx_core::{PluginCapabilities, PluginMetadata, PluginState, DEV_HOST_VERSION};

use crate::app::App;

fn metadata(name: &str) -> PluginMetadata {
    PluginMetadata { name: name.to_string(), version: "1.0.0".to_string(), description: String::new(), required_host_version: None }
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let app = App::for_routing_tests();
    let response = app.route_http("GET", "/nope", Vec::new(), Vec::new()).await;
    assert_eq!(response.status, 404);
}

#[tokio::test]
async fn plugins_listing_is_empty_json_array_when_nothing_is_registered() {
    let app = App::for_routing_tests();
    let response = app.route_http("GET", "/plugins", Vec::new(), Vec::new()).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"[]");
}

#[tokio::test]
async fn plugins_listing_reflects_registered_state() {
    let app = App::for_routing_tests();
    app.plugin_registry.register(metadata("fetch"), PluginCapabilities::default(), DEV_HOST_VERSION).unwrap();
    app.plugin_registry.set_state("fetch", PluginState::Running).unwrap();

    let response = app.route_http("GET", "/plugins", Vec::new(), Vec::new()).await;
    assert_eq!(response.status, 200);
    let body = String::from_utf8(response.body).unwrap();
    assert!(body.contains("\"name\":\"fetch\""));
    assert!(body.contains("\"state\":\"running\""));
}

#[tokio::test]
async fn health_route_is_503_for_an_unregistered_plugin() {
    let app = App::for_routing_tests();
    let response = app.route_http("GET", "/plugins/ghost/health", Vec::new(), Vec::new()).await;
    assert_eq!(response.status, 503);
}

#[tokio::test]
async fn health_route_is_503_when_ready_but_no_client_is_attached() {
    // A plugin can be `Running` in the registry (e.g. reconstructed state)
    // without a live `PluginClient` in this particular `App` — routing must
    // not assume the two are always in lockstep.
    let app = App::for_routing_tests();
    app.plugin_registry.register(metadata("fetch"), PluginCapabilities::default(), DEV_HOST_VERSION).unwrap();
    app.plugin_registry.set_state("fetch", PluginState::Running).unwrap();

    let response = app.route_http("GET", "/plugins/fetch/health", Vec::new(), Vec::new()).await;
    assert_eq!(response.status, 503);
}

#[tokio::test]
async fn api_proxy_is_503_when_the_plugin_is_not_ready() {
    let app = App::for_routing_tests();
    app.plugin_registry.register(metadata("fetch"), PluginCapabilities::default(), DEV_HOST_VERSION).unwrap();
    // left in `loading` state: not ready

    let response = app.route_http("GET", "/api/fetch/items", Vec::new(), Vec::new()).await;
    assert_eq!(response.status, 503);
}

#[tokio::test]
async fn api_proxy_is_503_for_an_unregistered_plugin() {
    // Unregistered is a degenerate case of "not ready" — same 503, no
    // separate not-found branch for the proxy route.
    let app = App::for_routing_tests();
    let response = app.route_http("GET", "/api/ghost/items", Vec::new(), Vec::new()).await;
    assert_eq!(response.status, 503);
}
