// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use super::*;
use std::collections::HashMap;

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId("tst-");
}

#[test]
fn define_id_round_trips_through_hash_map() {
    let id = TestId::new();
    let mut map = HashMap::new();
    map.insert(id, 42);
    assert_eq!(map.get(id.as_str()), Some(&42));
}

#[test]
fn define_id_has_prefix() {
    let id = TestId::new();
    assert!(id.as_str().starts_with("tst-"));
    assert_eq!(id.as_str().len(), ID_MAX_LEN);
}

#[test]
fn define_id_new_ids_are_unique() {
    assert_ne!(TestId::new(), TestId::new());
}

#[test]
fn define_id_from_string_round_trips() {
    let id = TestId::from_string("tst-abc123");
    assert_eq!(id.as_str(), "tst-abc123");
    assert_eq!(id.to_string(), "tst-abc123");
}

#[test]
fn define_id_suffix_strips_prefix() {
    let id = TestId::from_string("tst-abc123");
    assert_eq!(id.suffix(), "abc123");
}

#[test]
fn define_id_short_truncates_suffix() {
    let id = TestId::from_string("tst-abcdefghijklmnop");
    assert_eq!(id.short(4), "abcd");
}

#[test]
fn define_id_short_returns_full_when_shorter() {
    let id = TestId::from_string("tst-abc");
    assert_eq!(id.short(8), "abc");
}

#[test]
fn define_id_is_empty() {
    let id = TestId::from_string("");
    assert!(id.is_empty());
    assert!(!TestId::new().is_empty());
}

#[test]
fn define_id_default_generates_new() {
    let id = TestId::default();
    assert!(!id.is_empty());
}

#[test]
fn define_id_partial_eq_str() {
    let id = TestId::from_string("tst-abc");
    assert_eq!(id, "tst-abc");
    assert_eq!(id, *"tst-abc".to_string().as_str());
}

// --- short() free function tests ---

#[test]
fn short_fn_on_str() {
    let s = "abcdefghijklmnop";
    assert_eq!(short(s, 8), "abcdefgh");
    assert_eq!(short(s, 100), s);
    assert_eq!(short("abc", 8), "abc");
}

#[test]
fn idbuf_hash_matches_str_hash() {
    use std::hash::{Hash, Hasher};
    let buf = IdBuf::new("hello");
    let mut h1 = std::collections::hash_map::DefaultHasher::new();
    buf.hash(&mut h1);
    let mut h2 = std::collections::hash_map::DefaultHasher::new();
    "hello".hash(&mut h2);
    assert_eq!(h1.finish(), h2.finish());
}
