//! Error types for collector operations.

use thiserror::Error;

use crate::{pseudonym::Pseudonym, store::StoreError};

/// Errors surfaced by [`Collector`](super::Collector) operations.
///
/// Callers are expected to map the not-found variants to a rejected
/// request and `Storage` to a retryable server error; the collector itself
/// never retries.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CollectorError {
    /// An insert targeted an unknown or deactivated account.
    #[error("no active account with id {account_id}")]
    AccountNotFound {
        /// The account identifier the insert targeted
        account_id: String,
    },

    /// An identified insert was attempted for a pseudonym that has not
    /// completed key exchange. The event is rejected outright, never stored
    /// as anonymous.
    #[error("no key-exchange record for pseudonym {pseudonym}")]
    SecretNotFound {
        /// The derived pseudonym with no secret record
        pseudonym: Pseudonym,
    },

    /// The storage collaborator failed; `operation` names the stage.
    #[error("storage failure during {operation}")]
    Storage {
        /// The operation stage that failed
        operation: &'static str,
        /// The underlying storage error
        #[source]
        source: StoreError,
    },
}

impl CollectorError {
    pub(super) fn storage(operation: &'static str, source: StoreError) -> Self {
        CollectorError::Storage { operation, source }
    }

    /// Check if this error indicates a missing account or secret.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CollectorError::AccountNotFound { .. } | CollectorError::SecretNotFound { .. }
        )
    }

    /// Check if this error originated in the storage collaborator.
    pub fn is_storage_error(&self) -> bool {
        matches!(self, CollectorError::Storage { .. })
    }
}

// Conversion from CollectorError to the main Error type
impl From<CollectorError> for crate::Error {
    fn from(err: CollectorError) -> Self {
        crate::Error::Collector(err)
    }
}
