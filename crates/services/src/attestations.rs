// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Attestation service bridge (spec §4.E) — interface only. The
//! attestation storage/query engine is an external collaborator (spec
//! §1); only its contract is specified here.

use async_trait::async_trait;

use crate::error::ServiceError;

/// An attestation: `subject is predicate of context by actor on timestamp`
/// (spec GLOSSARY), as seen by a plugin recording a side-effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationDraft {
    pub subject: String,
    pub predicate: String,
    pub context: String,
    pub actor: String,
    /// Epoch milliseconds; `None` lets the store stamp "now".
    pub timestamp: Option<u64>,
}

/// Opaque identifier for a stored attestation.
pub type AttestationId = String;

/// Bridge surface a plugin uses to record attestations without depending
/// on the storage engine directly (spec §4.E).
#[async_trait]
pub trait ServiceAttestations: Send + Sync {
    /// Returns the existing attestation's id if an equivalent one already
    /// exists, otherwise creates and returns the new id.
    async fn create_if_absent(&self, draft: AttestationDraft) -> Result<AttestationId, ServiceError>;

    /// Generates an id and creates the attestation unconditionally.
    async fn generate_and_create(&self, draft: AttestationDraft) -> Result<AttestationId, ServiceError>;
}
