// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::tempdir;

use super::*;

/// Writes an empty file and marks it executable, as a real plugin binary
/// would be.
fn write_executable(path: &Path) {
    fs::write(path, b"").unwrap();
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}

#[test]
fn find_binary_prefers_the_plugin_suffixed_name() {
    let dir = tempdir().unwrap();
    write_executable(&dir.path().join("qntx-fetch"));
    write_executable(&dir.path().join("qntx-fetch-plugin"));

    let supervisor = Supervisor::new().with_search_paths(vec![dir.path().to_path_buf()]);
    let found = supervisor.find_binary("fetch").unwrap();
    assert_eq!(found.file_name().unwrap(), "qntx-fetch-plugin");
}

#[test]
fn find_binary_falls_back_to_the_bare_name() {
    let dir = tempdir().unwrap();
    write_executable(&dir.path().join("fetch"));

    let supervisor = Supervisor::new().with_search_paths(vec![dir.path().to_path_buf()]);
    let found = supervisor.find_binary("fetch").unwrap();
    assert_eq!(found.file_name().unwrap(), "fetch");
}

#[test]
fn find_binary_searches_paths_in_order() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    write_executable(&second.path().join("fetch"));

    let supervisor = Supervisor::new().with_search_paths(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
    let found = supervisor.find_binary("fetch").unwrap();
    assert_eq!(found.parent().unwrap(), second.path());
}

#[test]
fn find_binary_reports_not_found_when_no_path_has_it() {
    let dir = tempdir().unwrap();
    let supervisor = Supervisor::new().with_search_paths(vec![dir.path().to_path_buf()]);
    let err = supervisor.find_binary("ghost").unwrap_err();
    assert!(matches!(err, PluginError::BinaryNotFound(name) if name == "ghost"));
}

#[test]
fn find_binary_skips_a_non_executable_match() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("fetch"), b"").unwrap();

    let supervisor = Supervisor::new().with_search_paths(vec![dir.path().to_path_buf()]);
    let err = supervisor.find_binary("fetch").unwrap_err();
    assert!(matches!(err, PluginError::BinaryNotFound(name) if name == "fetch"));
}

#[tokio::test]
async fn launch_fails_fast_when_binary_is_missing() {
    let dir = tempdir().unwrap();
    let supervisor = Supervisor::new().with_search_paths(vec![dir.path().to_path_buf()]);
    let err = supervisor.launch("ghost").await.unwrap_err();
    assert!(matches!(err, PluginError::BinaryNotFound(_)));
}
