//! Tenant accounts and key-exchange secrets.
//!
//! Both record types are read-only from the core's perspective: accounts are
//! owned by the account-management layer and secrets are written by the key
//! exchange. The core reads accounts for their salt and status, and checks
//! secrets for existence before accepting identified events.

use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};

use crate::pseudonym::Pseudonym;

/// Length of generated account salts, in alphanumeric characters.
const SALT_LENGTH: usize = 32;

/// One tenant of the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier.
    pub id: String,
    /// Secret salt keying this account's pseudonym derivation. Never leaves
    /// the server.
    pub user_salt: String,
    /// Only active accounts accept new events; events of deactivated
    /// accounts stay queryable.
    pub active: bool,
}

impl Account {
    /// Creates an active account with the given identifier and salt.
    pub fn new(id: impl Into<String>, user_salt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_salt: user_salt.into(),
            active: true,
        }
    }

    /// Derives the pseudonym `raw_user_id` maps to under this account.
    pub fn pseudonym_for(&self, raw_user_id: &str) -> Pseudonym {
        Pseudonym::derive(&self.user_salt, raw_user_id)
    }

    /// Generates a fresh random salt for a new account.
    pub fn generate_salt() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LENGTH)
            .map(char::from)
            .collect()
    }
}

/// Proof that a pseudonym has completed client-side key exchange.
///
/// The key material is opaque at this layer; the core only checks that a
/// record exists before accepting identified events, so that every stored
/// event can be decrypted later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    /// The pseudonym this secret belongs to.
    pub pseudonym: Pseudonym,
    /// Client-encrypted key material.
    pub encrypted_key: String,
}

impl Secret {
    /// Creates a secret record for a pseudonym.
    pub fn new(pseudonym: Pseudonym, encrypted_key: impl Into<String>) -> Self {
        Self {
            pseudonym,
            encrypted_key: encrypted_key.into(),
        }
    }
}
