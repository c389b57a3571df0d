// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use std::io::Write;

use serial_test::serial;

use super::*;

#[test]
#[serial]
fn defaults_apply_when_the_file_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("QNTX_STATE_DIR", dir.path());
    std::env::remove_var("QNTX_CONFIG_PATH");
    std::env::remove_var("QNTX_PLUGIN_ENABLED");
    std::env::remove_var("QNTX_PLUGIN_PATHS");
    std::env::remove_var("QNTX_PULSE_TICK_INTERVAL_MS");
    std::env::remove_var("QNTX_PULSE_RETENTION_DAYS");
    std::env::remove_var("QNTX_PULSE_WORKER_COUNT");

    let config = Config::load().unwrap();
    assert!(config.plugin_enabled.is_empty());
    assert_eq!(config.pulse_tick_interval, Duration::from_secs(1));
    assert_eq!(config.pulse_execution_retention_days, 90);
    assert_eq!(config.pulse_worker_count, DEFAULT_WORKER_COUNT);
}

#[test]
#[serial]
fn toml_file_values_are_parsed() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("QNTX_STATE_DIR", dir.path());
    std::env::remove_var("QNTX_CONFIG_PATH");
    std::env::remove_var("QNTX_PLUGIN_ENABLED");
    std::env::remove_var("QNTX_PLUGIN_PATHS");
    std::env::remove_var("QNTX_PULSE_TICK_INTERVAL_MS");
    std::env::remove_var("QNTX_PULSE_RETENTION_DAYS");
    std::env::remove_var("QNTX_PULSE_WORKER_COUNT");

    let mut file = std::fs::File::create(dir.path().join("config.toml")).unwrap();
    writeln!(
        file,
        r#"
        [plugin]
        enabled = ["ingest", "enrich"]
        paths = ["/opt/qntx/plugins"]

        [pulse]
        tick_interval_ms = 500
        execution_retention_days = 30
        worker_count = 8
        "#
    )
    .unwrap();

    let config = Config::load().unwrap();
    assert_eq!(config.plugin_enabled, vec!["ingest", "enrich"]);
    assert_eq!(config.plugin_paths, vec![PathBuf::from("/opt/qntx/plugins")]);
    assert_eq!(config.pulse_tick_interval, Duration::from_millis(500));
    assert_eq!(config.pulse_execution_retention_days, 30);
    assert_eq!(config.pulse_worker_count, 8);
}

#[test]
#[serial]
fn env_overrides_win_over_the_file() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("QNTX_STATE_DIR", dir.path());
    std::env::remove_var("QNTX_CONFIG_PATH");
    std::env::set_var("QNTX_PLUGIN_ENABLED", "a, b ,c");
    std::env::set_var("QNTX_PULSE_WORKER_COUNT", "16");

    let config = Config::load().unwrap();
    assert_eq!(config.plugin_enabled, vec!["a", "b", "c"]);
    assert_eq!(config.pulse_worker_count, 16);

    std::env::remove_var("QNTX_PLUGIN_ENABLED");
    std::env::remove_var("QNTX_PULSE_WORKER_COUNT");
}

#[test]
fn missing_per_plugin_config_file_is_an_empty_map_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_plugin_config(dir.path(), "nonexistent").unwrap();
    assert!(config.is_empty());
}

#[test]
fn per_plugin_config_file_flattens_to_strings() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(dir.path().join("ingest.toml")).unwrap();
    writeln!(file, r#"api_key = "secret"
batch_size = 50
verbose = true"#).unwrap();

    let config = load_plugin_config(dir.path(), "ingest").unwrap();
    assert_eq!(config.get("api_key"), Some(&"secret".to_string()));
    assert_eq!(config.get("batch_size"), Some(&"50".to_string()));
    assert_eq!(config.get("verbose"), Some(&"true".to_string()));
}
