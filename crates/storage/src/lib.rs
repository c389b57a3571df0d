// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qntx-storage: the persistence adapter for QNTX's scheduled jobs,
//! executions, async jobs, and task logs.
//!
//! Durability comes from an append-only WAL ([`wal`]) plus periodic
//! zstd-compressed snapshots ([`snapshot`], [`checkpoint`]); reads go
//! against an in-memory [`state::MaterializedState`] projection kept up
//! to date by applying each `qntx_core::Event` as it is recorded.

pub mod checkpoint;
pub mod error;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod wal;

pub use error::StoreError;
pub use state::{MaterializedState, StageSummary, TaskSummary};
pub use store::{Engine, InMemoryStore, Store, WalStore};
