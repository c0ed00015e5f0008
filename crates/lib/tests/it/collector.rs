use chrono::DateTime;
use lethe::{EventId, store::Datastore};

use crate::helpers::{register_user, test_collector};

#[test]
fn full_event_lifecycle_across_accounts() {
    let t = test_collector(&["acme", "initiative"]);
    register_user(&t.store, "alice");

    // Alice browses sites of both tenants; one visitor stays anonymous.
    let a1 = t.collector.insert(Some("alice"), "acme", "a1").unwrap();
    let a2 = t.collector.insert(Some("alice"), "acme", "a2").unwrap();
    let i1 = t
        .collector
        .insert(Some("alice"), "initiative", "i1")
        .unwrap();
    t.collector.insert(None, "acme", "anon").unwrap();

    // Querying alice returns her events grouped per account, nothing else.
    let results = t.collector.query("alice", None).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(
        results["acme"].iter().map(|r| &r.event_id).collect::<Vec<_>>(),
        vec![&a1, &a2]
    );
    assert_eq!(results["initiative"][0].event_id, i1);

    // Right to erasure: the whole footprint disappears in one operation,
    // while the anonymous event is out of reach and survives.
    assert_eq!(t.collector.purge("alice").unwrap(), 3);
    assert!(t.collector.query("alice", None).unwrap().is_empty());

    // The client now reconciles: everything it knew about is gone.
    let deleted = t
        .collector
        .deleted_events(&[a1.clone(), a2.clone(), i1.clone()], Some("alice"))
        .unwrap();
    assert_eq!(deleted, vec![a1, a2, i1]);
}

#[test]
fn same_user_is_unlinkable_across_accounts() {
    let t = test_collector(&["acme", "initiative"]);
    register_user(&t.store, "alice");

    let a = t.collector.insert(Some("alice"), "acme", "a").unwrap();
    let i = t
        .collector
        .insert(Some("alice"), "initiative", "i")
        .unwrap();

    let stored = t.store.find_events_by_ids(&[a, i]).unwrap();
    let pseudonyms: Vec<_> = stored.iter().map(|e| e.pseudonym.clone().unwrap()).collect();
    assert_ne!(pseudonyms[0], pseudonyms[1]);
}

#[test]
fn rejected_identified_insert_writes_nothing() {
    let t = test_collector(&["acme"]);

    // bob never completed key exchange.
    assert!(t.collector.insert(Some("bob"), "acme", "p2").is_err());
    assert!(t.collector.query("bob", None).unwrap().is_empty());

    // Key exchange completes later; inserts start succeeding.
    register_user(&t.store, "bob");
    t.collector.insert(Some("bob"), "acme", "p3").unwrap();
    assert_eq!(t.collector.query("bob", None).unwrap()["acme"].len(), 1);
}

#[test]
fn since_filters_out_older_events() {
    let t = test_collector(&["acme"]);
    register_user(&t.store, "alice");

    t.collector.insert(Some("alice"), "acme", "monday").unwrap();

    t.clock.advance(24 * 60 * 60 * 1000);
    let tuesday = DateTime::from_timestamp_millis(t.clock.get()).unwrap();
    t.collector
        .insert(Some("alice"), "acme", "tuesday")
        .unwrap();

    let results = t.collector.query("alice", Some(tuesday)).unwrap();
    let payloads: Vec<&str> = results["acme"].iter().map(|r| r.payload.as_str()).collect();
    assert_eq!(payloads, vec!["tuesday"]);

    // Without a bound, everything comes back.
    assert_eq!(t.collector.query("alice", None).unwrap()["acme"].len(), 2);
}

#[test]
fn reconciliation_detects_cache_reset_and_server_deletions() {
    let t = test_collector(&["acme"]);
    register_user(&t.store, "alice");

    let known = t.collector.insert(Some("alice"), "acme", "known").unwrap();
    // Persisted under alice's pseudonym before her local cache was reset.
    let forgotten = t
        .collector
        .insert(Some("alice"), "acme", "forgotten")
        .unwrap();

    // The ghost was deleted server-side (e.g. by retention) at some point.
    let ghost = EventId::from("ghost");
    let deleted = t
        .collector
        .deleted_events(&[known.clone(), ghost.clone()], Some("alice"))
        .unwrap();
    assert_eq!(deleted, vec![ghost.clone(), forgotten]);

    // Without an identifier, only the existence check runs.
    let deleted = t.collector.deleted_events(&[known, ghost.clone()], None).unwrap();
    assert_eq!(deleted, vec![ghost]);
}

#[test]
fn deactivated_accounts_reject_inserts_but_stay_queryable() {
    let t = test_collector(&["acme"]);
    register_user(&t.store, "alice");

    let before = t.collector.insert(Some("alice"), "acme", "early").unwrap();

    // The tenant closes their account; the salt must stay on record or
    // alice's history becomes unreachable.
    let mut acme = t.store.find_active_account("acme").unwrap();
    acme.active = false;
    t.store.put_account(acme);

    assert!(t.collector.insert(Some("alice"), "acme", "late").is_err());

    let results = t.collector.query("alice", None).unwrap();
    assert_eq!(results["acme"][0].event_id, before);

    // Erasure still reaches the deactivated account's events.
    assert_eq!(t.collector.purge("alice").unwrap(), 1);
}

#[test]
fn health_check_succeeds_on_a_live_store() {
    let t = test_collector(&[]);
    t.collector.check_health().unwrap();
}
