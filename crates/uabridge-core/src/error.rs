//! Error types.
//!
//! The engine surfaces no structured errors for skipped or unrecognized
//! properties; the only failure a caller sees is a provider failure, which
//! aborts the event it occurred in.

use crate::provider::ProviderError;

/// Errors surfaced by the update pipeline.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The external address-space provider failed; the event was aborted
    /// with no rollback.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
