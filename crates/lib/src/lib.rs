//!
//! Lethe: the pseudonymization and lifecycle core of a privacy-preserving
//! analytics collector. Events are collected; people are forgotten.
//!
//! ## Core Concepts
//!
//! * **Pseudonyms (`pseudonym::Pseudonym`)**: account-scoped, irreversible
//!   stand-ins for raw user identifiers, derived with a keyed hash over the
//!   account's secret salt. The same user looks unrelated under two
//!   different accounts.
//! * **Accounts (`account::Account`)**: tenants of the collector. Each one
//!   owns the salt keying its pseudonym derivation; only active accounts
//!   accept new events.
//! * **Secrets (`account::Secret`)**: proof that a pseudonym has completed
//!   client-side key exchange. Identified events are only accepted when the
//!   matching secret exists, so every stored event stays decryptable.
//! * **Events (`event::Event`)**: immutable records with an opaque,
//!   client-encrypted payload. Identified events carry a pseudonym;
//!   anonymous events carry none and are unreachable from every
//!   user-scoped path.
//! * **Datastores (`store::Datastore`)**: the pluggable persistence seam.
//!   The core reads accounts and secrets, appends events, and removes them
//!   in bulk - nothing else.
//! * **The Collector (`collector::Collector`)**: the only layer that sees
//!   raw user identifiers. It pseudonymizes on ingest, fans out across all
//!   accounts for queries and purges, and reconciles client-known event IDs
//!   against server state.

pub mod account;
pub mod clock;
pub mod collector;
pub mod event;
pub mod pseudonym;
pub mod store;

pub use account::{Account, Secret};
#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;
pub use clock::{Clock, SystemClock};
pub use collector::Collector;
pub use event::{Event, EventId, EventResult};
pub use pseudonym::Pseudonym;
pub use store::{Datastore, InMemory};

/// Result type used throughout the lethe library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the lethe library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured collector errors from the collector module
    #[error(transparent)]
    Collector(collector::CollectorError),

    /// Structured storage errors from the store module
    #[error(transparent)]
    Store(store::StoreError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Collector(_) => "collector",
            Error::Store(_) => "store",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Collector(err) => err.is_not_found(),
            Error::Store(err) => err.is_not_found(),
        }
    }

    /// Check if this error originated in the storage collaborator.
    pub fn is_storage_error(&self) -> bool {
        match self {
            Error::Collector(err) => err.is_storage_error(),
            Error::Store(_) => true,
        }
    }
}
