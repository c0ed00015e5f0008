use std::collections::HashSet;

use lethe::{Account, Pseudonym, pseudonym::pseudonyms_for_accounts};

#[test]
fn derivation_is_stable_and_salt_scoped() {
    let salt = Account::generate_salt();

    // Deterministic for as long as the salt is unchanged...
    assert_eq!(
        Pseudonym::derive(&salt, "alice"),
        Pseudonym::derive(&salt, "alice")
    );
    // ...and distinct per user within one account.
    assert_ne!(
        Pseudonym::derive(&salt, "alice"),
        Pseudonym::derive(&salt, "bob")
    );
}

#[test]
fn accounts_cannot_link_a_shared_user() {
    // Two tenants with independent salts see the same visitor; the values
    // they store must have nothing in common.
    let acme = Account::new("acme", Account::generate_salt());
    let initiative = Account::new("initiative", Account::generate_salt());

    assert_ne!(
        acme.pseudonym_for("alice"),
        initiative.pseudonym_for("alice")
    );
}

#[test]
fn fan_out_covers_every_account_exactly_once() {
    let accounts: Vec<Account> = (0..32)
        .map(|i| Account::new(format!("account-{i}"), Account::generate_salt()))
        .collect();

    let fanned = pseudonyms_for_accounts("alice", &accounts);
    let sequential: HashSet<Pseudonym> = accounts
        .iter()
        .map(|account| account.pseudonym_for("alice"))
        .collect();

    assert_eq!(fanned, sequential);
    assert_eq!(fanned.len(), accounts.len());
}

#[test]
fn fan_out_of_no_accounts_is_empty() {
    assert!(pseudonyms_for_accounts("alice", &[]).is_empty());
}
