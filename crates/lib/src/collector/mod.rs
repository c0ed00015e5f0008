//! The event-pseudonymization and lifecycle core.
//!
//! [`Collector`] is the only layer that sees raw user identifiers. Every
//! operation translates the raw identifier into account-scoped pseudonyms
//! before touching the storage collaborator:
//!
//! * [`insert`](Collector::insert) pseudonymizes on ingest and gates
//!   identified events on an existing key-exchange record.
//! * [`query`](Collector::query) and [`purge`](Collector::purge) fan the
//!   identifier out across every known account and address events by the
//!   resulting pseudonym set, so anonymous events are unreachable by
//!   construction.
//! * [`deleted_events`](Collector::deleted_events) reconciles a client's
//!   known event IDs against server state from both sides: IDs that are
//!   gone, and server-side events the client's current identifier maps to
//!   but never recorded.
//!
//! The HTTP layer above passes raw identifiers extracted from signed
//! cookies; the collector never touches cookies, status codes, or request
//! bodies.

pub mod errors;

pub use errors::CollectorError;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    Result,
    clock::{Clock, SystemClock},
    event::{Event, EventId, EventResult},
    pseudonym,
    store::Datastore,
};

/// The pseudonymization and lifecycle core of the collector.
pub struct Collector {
    store: Arc<dyn Datastore>,
    clock: Arc<dyn Clock>,
}

impl Collector {
    /// Creates a collector over the given storage collaborator, stamping
    /// events with the system clock.
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Creates a collector with a caller-provided clock.
    pub fn with_clock(store: Arc<dyn Datastore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Validates and persists one event, returning its generated ID.
    ///
    /// A missing or empty `raw_user_id` makes the event anonymous. An
    /// identified event is accepted only if its derived pseudonym has a
    /// key-exchange record - otherwise the insert fails with
    /// [`CollectorError::SecretNotFound`] and nothing is written. The check
    /// runs on every insert; key-exchange state can change between requests.
    pub fn insert(
        &self,
        raw_user_id: Option<&str>,
        account_id: &str,
        payload: impl Into<String>,
    ) -> Result<EventId> {
        let event_id = EventId::generate();

        let account = match self.store.find_active_account(account_id) {
            Ok(account) => account,
            Err(err) if err.is_not_found() => {
                return Err(CollectorError::AccountNotFound {
                    account_id: account_id.to_string(),
                }
                .into());
            }
            Err(err) => return Err(CollectorError::storage("account lookup", err).into()),
        };

        let pseudonym = raw_user_id
            .filter(|raw| !raw.is_empty())
            .map(|raw| account.pseudonym_for(raw));

        if let Some(ref pseudonym) = pseudonym {
            if let Err(err) = self.store.find_secret(pseudonym) {
                if err.is_not_found() {
                    return Err(CollectorError::SecretNotFound {
                        pseudonym: pseudonym.clone(),
                    }
                    .into());
                }
                return Err(CollectorError::storage("secret lookup", err).into());
            }
        }

        self.store
            .create_event(Event {
                event_id: event_id.clone(),
                account_id: account.id,
                pseudonym,
                payload: payload.into(),
                inserted_at: self.clock.now(),
            })
            .map_err(|err| CollectorError::storage("event insert", err))?;

        debug!(event_id = %event_id, account_id, "event persisted");
        Ok(event_id)
    }

    /// Retrieves all of a user's events across every account, grouped by
    /// account identifier.
    ///
    /// Inactive accounts are included - historical data stays queryable
    /// after deactivation. `since` is an inclusive lower bound on insertion
    /// time. Within each account, results preserve insertion order; accounts
    /// with no matching events are absent from the map.
    pub fn query(
        &self,
        raw_user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<HashMap<String, Vec<EventResult>>> {
        let pseudonyms = self.pseudonyms_everywhere(raw_user_id)?;
        let events = self
            .store
            .find_events_by_pseudonyms(&pseudonyms, since)
            .map_err(|err| CollectorError::storage("event lookup", err))?;

        let mut results: HashMap<String, Vec<EventResult>> = HashMap::new();
        for event in events {
            results
                .entry(event.account_id.clone())
                .or_default()
                .push(event.into());
        }
        Ok(results)
    }

    /// Erases the user's whole footprint across every account this server
    /// knows about, returning the number of events removed.
    ///
    /// Not selective by account or time; matching nothing is a no-op, not an
    /// error.
    pub fn purge(&self, raw_user_id: &str) -> Result<usize> {
        let pseudonyms = self.pseudonyms_everywhere(raw_user_id)?;
        let deleted = self
            .store
            .delete_events_by_pseudonyms(&pseudonyms)
            .map_err(|err| CollectorError::storage("event purge", err))?;

        info!(deleted, "purged user events");
        Ok(deleted)
    }

    /// Reconciles a client's known event IDs against server state and
    /// returns the IDs the client should consider deleted.
    ///
    /// Every known ID that no longer exists server-side is reported. When
    /// `raw_user_id` is given, events that belong to the user's current
    /// pseudonyms but are missing from `known_ids` are reported as well:
    /// the client's identifier rotated or its local cache was reset, and
    /// holding on to them would link stale identifiers. The two sources are
    /// disjoint - one lists missing IDs, the other existing ones - so the
    /// result carries no duplicates.
    pub fn deleted_events(
        &self,
        known_ids: &[EventId],
        raw_user_id: Option<&str>,
    ) -> Result<Vec<EventId>> {
        let existing = self
            .store
            .find_events_by_ids(known_ids)
            .map_err(|err| CollectorError::storage("event lookup", err))?;
        let existing: HashSet<&EventId> = existing.iter().map(|event| &event.event_id).collect();

        let mut deleted: Vec<EventId> = known_ids
            .iter()
            .filter(|id| !existing.contains(id))
            .cloned()
            .collect();

        if let Some(raw) = raw_user_id.filter(|raw| !raw.is_empty()) {
            let pseudonyms = self.pseudonyms_everywhere(raw)?;
            let foreign = self
                .store
                .find_events_excluding(known_ids, &pseudonyms)
                .map_err(|err| CollectorError::storage("foreign event lookup", err))?;

            debug!(
                missing = deleted.len(),
                foreign = foreign.len(),
                "reconciled client event ids"
            );
            deleted.extend(foreign.into_iter().map(|event| event.event_id));
        }

        Ok(deleted)
    }

    /// Storage liveness passthrough for health endpoints.
    pub fn check_health(&self) -> Result<()> {
        self.store
            .ping()
            .map_err(|err| CollectorError::storage("health check", err))?;
        Ok(())
    }

    /// Derives the user's pseudonym under every account, active or not.
    fn pseudonyms_everywhere(&self, raw_user_id: &str) -> Result<HashSet<crate::Pseudonym>> {
        let accounts = self
            .store
            .find_all_accounts()
            .map_err(|err| CollectorError::storage("account listing", err))?;
        Ok(pseudonym::pseudonyms_for_accounts(raw_user_id, &accounts))
    }
}
