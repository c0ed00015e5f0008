//! Error types for storage collaborators.

use thiserror::Error;

use crate::{event::EventId, pseudonym::Pseudonym};

/// Errors surfaced by [`Datastore`](super::Datastore) implementations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// No active account matches the identifier.
    #[error("no active account: {id}")]
    AccountNotFound {
        /// The account identifier that was looked up
        id: String,
    },

    /// No key-exchange record exists for the pseudonym.
    #[error("no secret for pseudonym: {pseudonym}")]
    SecretNotFound {
        /// The pseudonym that was looked up
        pseudonym: Pseudonym,
    },

    /// An event with this identifier already exists. Identifiers are drawn
    /// from a CSPRNG, so a collision indicates misconfiguration rather than
    /// bad luck, and is not retried.
    #[error("duplicate event id: {id}")]
    DuplicateEventId {
        /// The colliding event identifier
        id: EventId,
    },

    /// The backend could not serve the request.
    #[error("storage backend unavailable: {reason}")]
    Unavailable {
        /// Description of the backend fault
        reason: String,
    },
}

impl StoreError {
    /// Check if this error indicates a record was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::AccountNotFound { .. } | StoreError::SecretNotFound { .. }
        )
    }
}

// Conversion from StoreError to the main Error type
impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
