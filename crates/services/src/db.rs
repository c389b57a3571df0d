// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Opaque database handle abstraction (spec §4.E).
//!
//! The attestation storage engine is out of scope (spec §1) — plugin code
//! should treat this as a remote call whether the underlying store is
//! local or not, so the trait only names the handle, not its schema.

/// An opaque handle a plugin can present back to the host when it needs
/// to address "my database" without the core interpreting what that means.
pub trait ServiceDb: Send + Sync {
    /// Connection string or identifier, opaque to the core.
    fn handle(&self) -> &str;
}

/// A handle that is just a fixed string, useful for wiring tests and for
/// hosts that proxy straight through to an external store by name.
#[derive(Debug, Clone)]
pub struct NamedDb(String);

impl NamedDb {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }
}

impl ServiceDb for NamedDb {
    fn handle(&self) -> &str {
        &self.0
    }
}
