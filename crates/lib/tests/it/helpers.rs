use std::sync::Arc;

use lethe::{Account, Collector, FixedClock, InMemory, Secret, store::Datastore};

/// A collector wired to a seeded in-memory store and a controllable clock.
pub struct TestCollector {
    pub collector: Collector,
    pub store: Arc<InMemory>,
    pub clock: Arc<FixedClock>,
}

/// Creates a collector over an in-memory store seeded with one active
/// account per entry of `account_ids`, each with a fresh random salt.
pub fn test_collector(account_ids: &[&str]) -> TestCollector {
    let store = Arc::new(InMemory::new());
    for id in account_ids {
        store.put_account(Account::new(*id, Account::generate_salt()));
    }

    let clock = Arc::new(FixedClock::default());
    let collector = Collector::with_clock(store.clone(), clock.clone());
    TestCollector {
        collector,
        store,
        clock,
    }
}

/// Completes the key exchange for `raw_user_id` under every seeded account,
/// the way the exchange layer would after a successful handshake.
pub fn register_user(store: &InMemory, raw_user_id: &str) {
    for account in store.find_all_accounts().unwrap() {
        store.put_secret(Secret::new(
            account.pseudonym_for(raw_user_id),
            "encrypted-key-material",
        ));
    }
}
