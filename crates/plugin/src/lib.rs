// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qntx-plugin: plugin discovery, process supervision, and the registry of
//! live plugins (spec §4.E).

mod error;
mod proxy;
mod registry;
mod supervisor;

pub use error::PluginError;
pub use proxy::ProxyHandler;
pub use registry::{get_default, set_default, PluginEntry, Registry};
pub use supervisor::{LaunchedPlugin, Supervisor};
