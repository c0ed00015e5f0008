//! Pseudonym derivation and cross-account fan-out.
//!
//! A [`Pseudonym`] stands in for a raw user identifier inside one account:
//! HMAC-SHA256 keyed with the account's secret salt, hex encoded. The same
//! (salt, user) pair always derives the same value, the mapping cannot be
//! inverted without the salt, and two accounts' salts produce unlinkable
//! values for the same user.

use std::collections::HashSet;
use std::fmt;

use hmac::{Hmac, Mac};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::account::Account;

type HmacSha256 = Hmac<Sha256>;

/// Account lists below this length are hashed sequentially; the rayon pool
/// only pays off once the per-request hash work is non-trivial.
const PARALLEL_THRESHOLD: usize = 4;

/// An account-scoped, irreversible pseudonym for a raw user identifier.
///
/// Represents a hex-encoded HMAC-SHA256 output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pseudonym(String);

impl Pseudonym {
    /// Derives the pseudonym for `raw_user_id` under an account's salt.
    ///
    /// Deterministic and total: any pair of strings is accepted, there is no
    /// error path, and identical inputs always yield identical output.
    pub fn derive(user_salt: &str, raw_user_id: &str) -> Self {
        // HMAC with the salt as key, the user identifier as message.
        let mut mac = HmacSha256::new_from_slice(user_salt.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(raw_user_id.as_bytes());
        Pseudonym(hex::encode(mac.finalize().into_bytes()))
    }

    /// Returns the pseudonym as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Pseudonym {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Pseudonym {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for Pseudonym {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pseudonym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0)
    }
}

/// Derives the pseudonym for `raw_user_id` under every account and returns
/// the complete, order-independent set.
///
/// A user may hold events under many accounts at once, and repeating the
/// keyed hash across a long account list is CPU-bound work, so the map runs
/// on the rayon worker pool. Derivation has no failure mode and the collect
/// blocks until every worker has produced its value - there are no channels
/// to drain and no stragglers to leak when a caller gives up early.
pub fn pseudonyms_for_accounts(raw_user_id: &str, accounts: &[Account]) -> HashSet<Pseudonym> {
    if accounts.is_empty() {
        return HashSet::new();
    }
    if accounts.len() < PARALLEL_THRESHOLD {
        return accounts
            .iter()
            .map(|account| account.pseudonym_for(raw_user_id))
            .collect();
    }
    accounts
        .par_iter()
        .map(|account| account.pseudonym_for(raw_user_id))
        .collect()
}
