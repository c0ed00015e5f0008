//! Persisted analytics events.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pseudonym::Pseudonym;

/// Globally unique identifier of a persisted event.
///
/// Generated once at insert time from a CSPRNG and immutable afterwards.
/// Uniqueness holds across the whole store, not per account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        EventId(Uuid::new_v4().simple().to_string())
    }

    /// Creates an ID from any string-like input.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0)
    }
}

/// A persisted analytics record.
///
/// The payload is an opaque, client-encrypted blob; no layer of the server
/// inspects it. Identified events carry the pseudonym derived at insert
/// time, anonymous events carry none - which makes anonymous events
/// unreachable from every user-scoped query, purge, and reconciliation
/// path, all of which address events by pseudonym.
///
/// Events are never updated in place: they are created by an insert and
/// destroyed by a bulk purge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Globally unique event identifier.
    pub event_id: EventId,
    /// The account this event belongs to.
    pub account_id: String,
    /// Present for identified events, absent for anonymous ones.
    pub pseudonym: Option<Pseudonym>,
    /// Opaque client-encrypted payload.
    pub payload: String,
    /// Insertion time, the lower-bound filter for queries.
    pub inserted_at: DateTime<Utc>,
}

/// One query match: which account an event belongs to, its opaque payload,
/// and its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResult {
    /// The account the event belongs to.
    pub account_id: String,
    /// Opaque client-encrypted payload.
    pub payload: String,
    /// The event's identifier.
    pub event_id: EventId,
}

impl From<Event> for EventResult {
    fn from(event: Event) -> Self {
        Self {
            account_id: event.account_id,
            payload: event.payload,
            event_id: event.event_id,
        }
    }
}
