//! Storage collaborators for the collector core.
//!
//! The [`Datastore`] trait is the seam between the pseudonymization core and
//! whatever engine actually persists accounts, secrets, and events. The core
//! never addresses storage by raw user identifier - every user-scoped
//! operation arrives here already translated into a pseudonym set.
//!
//! Accounts and secrets are read-only through this trait; events are
//! appended by inserts and removed in bulk by purges, never updated in
//! place. Implementations own all concurrent-write safety.

pub mod errors;
mod in_memory;

pub use errors::StoreError;
pub use in_memory::InMemory;

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::{
    account::{Account, Secret},
    event::{Event, EventId},
    pseudonym::Pseudonym,
};

/// Result alias for storage operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Synchronous data-access contract the collector core is built against.
///
/// All methods block for the duration of the underlying lookup. Not-found
/// conditions are typed (`AccountNotFound`, `SecretNotFound`) so callers can
/// distinguish them from backend faults.
pub trait Datastore: Send + Sync {
    /// Looks up an account by identifier, restricted to active accounts.
    ///
    /// Returns `AccountNotFound` for unknown and deactivated accounts alike.
    fn find_active_account(&self, account_id: &str) -> StoreResult<Account>;

    /// Returns every known account, active and inactive. Historical events
    /// of deactivated accounts must remain addressable.
    fn find_all_accounts(&self) -> StoreResult<Vec<Account>>;

    /// Looks up the key-exchange record for a pseudonym.
    fn find_secret(&self, pseudonym: &Pseudonym) -> StoreResult<Secret>;

    /// Persists one event.
    ///
    /// Event identifiers are unique across the whole store; a duplicate is
    /// rejected with `DuplicateEventId`.
    fn create_event(&self, event: Event) -> StoreResult<()>;

    /// Returns all events whose pseudonym is in `pseudonyms`, inserted at or
    /// after `since` when a bound is given, preserving insertion order.
    fn find_events_by_pseudonyms(
        &self,
        pseudonyms: &HashSet<Pseudonym>,
        since: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<Event>>;

    /// Returns the subset of `ids` that currently exist.
    fn find_events_by_ids(&self, ids: &[EventId]) -> StoreResult<Vec<Event>>;

    /// Returns events that belong to one of `pseudonyms` but whose ID is not
    /// in `known_ids`.
    fn find_events_excluding(
        &self,
        known_ids: &[EventId],
        pseudonyms: &HashSet<Pseudonym>,
    ) -> StoreResult<Vec<Event>>;

    /// Deletes every event whose pseudonym is in `pseudonyms` and returns
    /// the number removed. Matching nothing deletes nothing and is not an
    /// error.
    fn delete_events_by_pseudonyms(&self, pseudonyms: &HashSet<Pseudonym>) -> StoreResult<usize>;

    /// Liveness probe for the underlying engine.
    fn ping(&self) -> StoreResult<()>;
}
