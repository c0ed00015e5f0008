//! In-memory storage collaborator.
//!
//! Reference implementation of [`Datastore`] used by the test suite and by
//! small single-process deployments. Events are kept in arrival order, so
//! queries preserve per-account insertion order without an extra sort.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use super::{Datastore, StoreError, StoreResult};
use crate::{
    account::{Account, Secret},
    event::{Event, EventId},
    pseudonym::Pseudonym,
};

/// An in-memory [`Datastore`] backed by `RwLock`-guarded maps.
#[derive(Debug, Default)]
pub struct InMemory {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    secrets: HashMap<Pseudonym, Secret>,
    /// Arrival order; never reordered.
    events: Vec<Event>,
}

impl InMemory {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account, replacing any previous record with the same ID.
    ///
    /// Account management is not part of the core; this is the bootstrap and
    /// test surface.
    pub fn put_account(&self, account: Account) {
        let mut state = self.write_state();
        state.accounts.insert(account.id.clone(), account);
    }

    /// Registers a key-exchange record for a pseudonym, replacing any
    /// previous one. Written by the key-exchange layer in a full deployment.
    pub fn put_secret(&self, secret: Secret) {
        let mut state = self.write_state();
        state.secrets.insert(secret.pseudonym.clone(), secret);
    }

    fn read_state(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, State>> {
        self.state.read().map_err(|_| StoreError::Unavailable {
            reason: "state lock poisoned".to_string(),
        })
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        // Seeding helpers cannot report errors; recover the data even if a
        // writer panicked.
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn try_write_state(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, State>> {
        self.state.write().map_err(|_| StoreError::Unavailable {
            reason: "state lock poisoned".to_string(),
        })
    }
}

impl Datastore for InMemory {
    fn find_active_account(&self, account_id: &str) -> StoreResult<Account> {
        let state = self.read_state()?;
        state
            .accounts
            .get(account_id)
            .filter(|account| account.active)
            .cloned()
            .ok_or_else(|| StoreError::AccountNotFound {
                id: account_id.to_string(),
            })
    }

    fn find_all_accounts(&self) -> StoreResult<Vec<Account>> {
        let state = self.read_state()?;
        Ok(state.accounts.values().cloned().collect())
    }

    fn find_secret(&self, pseudonym: &Pseudonym) -> StoreResult<Secret> {
        let state = self.read_state()?;
        state
            .secrets
            .get(pseudonym)
            .cloned()
            .ok_or_else(|| StoreError::SecretNotFound {
                pseudonym: pseudonym.clone(),
            })
    }

    fn create_event(&self, event: Event) -> StoreResult<()> {
        let mut state = self.try_write_state()?;
        if state.events.iter().any(|e| e.event_id == event.event_id) {
            return Err(StoreError::DuplicateEventId { id: event.event_id });
        }
        state.events.push(event);
        Ok(())
    }

    fn find_events_by_pseudonyms(
        &self,
        pseudonyms: &HashSet<Pseudonym>,
        since: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<Event>> {
        let state = self.read_state()?;
        Ok(state
            .events
            .iter()
            .filter(|event| {
                event
                    .pseudonym
                    .as_ref()
                    .is_some_and(|p| pseudonyms.contains(p))
                    && since.is_none_or(|bound| event.inserted_at >= bound)
            })
            .cloned()
            .collect())
    }

    fn find_events_by_ids(&self, ids: &[EventId]) -> StoreResult<Vec<Event>> {
        let state = self.read_state()?;
        Ok(state
            .events
            .iter()
            .filter(|event| ids.contains(&event.event_id))
            .cloned()
            .collect())
    }

    fn find_events_excluding(
        &self,
        known_ids: &[EventId],
        pseudonyms: &HashSet<Pseudonym>,
    ) -> StoreResult<Vec<Event>> {
        let state = self.read_state()?;
        Ok(state
            .events
            .iter()
            .filter(|event| {
                event
                    .pseudonym
                    .as_ref()
                    .is_some_and(|p| pseudonyms.contains(p))
                    && !known_ids.contains(&event.event_id)
            })
            .cloned()
            .collect())
    }

    fn delete_events_by_pseudonyms(&self, pseudonyms: &HashSet<Pseudonym>) -> StoreResult<usize> {
        let mut state = self.try_write_state()?;
        let before = state.events.len();
        state.events.retain(|event| {
            !event
                .pseudonym
                .as_ref()
                .is_some_and(|p| pseudonyms.contains(p))
        });
        Ok(before - state.events.len())
    }

    fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
