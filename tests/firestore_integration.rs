// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (FIRESTORE_EMULATOR_HOST set); otherwise they are skipped.

use covid_tracker::db::new_document_id;
use covid_tracker::models::{CovidCacheEntry, Record, User};
use covid_tracker::time_utils::{format_utc_rfc3339_micros, monotonic_now};
use serde_json::json;

mod common;
use common::test_db;

/// Unique ID for test isolation across runs against the same emulator.
fn unique_id(prefix: &str) -> String {
    format!("{}-{}", prefix, new_document_id().unwrap())
}

fn test_user(google_id: &str) -> User {
    User {
        id: new_document_id().unwrap(),
        google_id: google_id.to_string(),
        display_name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        created_at: "2024-01-15T10:00:00Z".to_string(),
    }
}

fn test_record(owner: &str, n: i64) -> Record {
    Record {
        id: new_document_id().unwrap(),
        user: Some(owner.to_string()),
        api_key_used: "test_api_key".to_string(),
        data: json!({ "n": n }),
        created_at: format_utc_rfc3339_micros(monotonic_now()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_insert_and_lookup() {
    require_emulator!();

    let db = test_db().await;
    let google_id = unique_id("google");

    // Initially, user should not exist
    let before = db.find_user_by_google_id(&google_id).await.unwrap();
    assert!(before.is_none(), "User should not exist before creation");

    let user = test_user(&google_id);
    db.insert_user(&user).await.unwrap();

    let by_id = db.get_user(&user.id).await.unwrap();
    assert_eq!(by_id.as_ref(), Some(&user));

    let by_google = db.find_user_by_google_id(&google_id).await.unwrap();
    assert_eq!(by_google, Some(user));
}

#[tokio::test]
async fn test_find_any_user_after_insert() {
    require_emulator!();

    let db = test_db().await;
    db.insert_user(&test_user(&unique_id("google"))).await.unwrap();

    assert!(db.find_any_user().await.unwrap().is_some());
}

// ═══════════════════════════════════════════════════════════════════════════
// RECORD TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_records_listed_newest_first() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_id("owner");

    for n in 0..3 {
        db.insert_record(&test_record(&owner, n)).await.unwrap();
    }

    let records = db.list_records_for_user(&owner).await.unwrap();
    let order: Vec<i64> = records
        .iter()
        .map(|r| r.data["n"].as_i64().unwrap())
        .collect();
    assert_eq!(order, vec![2, 1, 0]);
}

#[tokio::test]
async fn test_delete_records_is_scoped_to_owner() {
    require_emulator!();

    let db = test_db().await;
    let alice = unique_id("alice");
    let bob = unique_id("bob");

    db.insert_record(&test_record(&alice, 1)).await.unwrap();
    db.insert_record(&test_record(&alice, 2)).await.unwrap();
    db.insert_record(&test_record(&bob, 3)).await.unwrap();

    let deleted = db.delete_records_for_user(&alice).await.unwrap();
    assert_eq!(deleted, 2);

    assert!(db.list_records_for_user(&alice).await.unwrap().is_empty());
    assert_eq!(db.list_records_for_user(&bob).await.unwrap().len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// COVID CACHE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_covid_entry_overwrite() {
    require_emulator!();

    let db = test_db().await;
    let key = unique_id("COUNTRY").to_uppercase();

    assert!(db.get_covid_entry(&key).await.unwrap().is_none());

    let mut entry = CovidCacheEntry {
        country_key: key.clone(),
        country: "Testland".to_string(),
        cases: 10,
        deaths: 1,
        recovered: 5,
        created_at: "2024-01-15T10:00:00Z".to_string(),
    };
    db.set_covid_entry(&entry).await.unwrap();

    entry.cases = 20;
    db.set_covid_entry(&entry).await.unwrap();

    let fetched = db.get_covid_entry(&key).await.unwrap().unwrap();
    assert_eq!(fetched.cases, 20);
    assert_eq!(fetched.country, "Testland");
}
