// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store for local development and tests.
//!
//! Mirrors the Firestore operations one-for-one. Data lives only as long as
//! the process.

use crate::models::{CovidCacheEntry, Record, User};
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Default)]
struct Collections {
    users: DashMap<String, User>,
    records: DashMap<String, Record>,
    covid_cache: DashMap<String, CovidCacheEntry>,
}

/// Shared in-memory store. Clones share the same collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.inner.users.get(user_id).map(|u| u.value().clone())
    }

    pub fn find_user_by_google_id(&self, google_id: &str) -> Option<User> {
        self.inner
            .users
            .iter()
            .find(|u| u.google_id == google_id)
            .map(|u| u.value().clone())
    }

    pub fn find_any_user(&self) -> Option<User> {
        self.inner
            .users
            .iter()
            .min_by(|a, b| a.created_at.cmp(&b.created_at))
            .map(|u| u.value().clone())
    }

    pub fn insert_user(&self, user: &User) {
        self.inner.users.insert(user.id.clone(), user.clone());
    }

    pub fn insert_record(&self, record: &Record) {
        self.inner.records.insert(record.id.clone(), record.clone());
    }

    pub fn list_records_for_user(&self, user_id: &str) -> Vec<Record> {
        let mut records: Vec<Record> = self
            .inner
            .records
            .iter()
            .filter(|r| r.user.as_deref() == Some(user_id))
            .map(|r| r.value().clone())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    pub fn delete_records_for_user(&self, user_id: &str) -> usize {
        let mut removed = 0;
        self.inner.records.retain(|_, r| {
            let keep = r.user.as_deref() != Some(user_id);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn get_covid_entry(&self, key: &str) -> Option<CovidCacheEntry> {
        self.inner.covid_cache.get(key).map(|e| e.value().clone())
    }

    pub fn set_covid_entry(&self, entry: &CovidCacheEntry) {
        self.inner
            .covid_cache
            .insert(entry.country_key.clone(), entry.clone());
    }

    /// Number of cached COVID entries.
    pub fn covid_entry_count(&self) -> usize {
        self.inner.covid_cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, user: Option<&str>, created_at: &str) -> Record {
        Record {
            id: id.to_string(),
            user: user.map(String::from),
            api_key_used: "key".to_string(),
            data: json!({ "id": id }),
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn test_list_is_scoped_and_newest_first() {
        let store = MemoryStore::new();
        store.insert_record(&record("a", Some("u1"), "2024-01-01T00:00:00.000001Z"));
        store.insert_record(&record("b", Some("u1"), "2024-01-01T00:00:00.000003Z"));
        store.insert_record(&record("c", Some("u2"), "2024-01-01T00:00:00.000002Z"));
        store.insert_record(&record("d", None, "2024-01-01T00:00:00.000004Z"));

        let ids: Vec<_> = store
            .list_records_for_user("u1")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_delete_only_touches_owner() {
        let store = MemoryStore::new();
        store.insert_record(&record("a", Some("u1"), "2024-01-01T00:00:00.000001Z"));
        store.insert_record(&record("b", Some("u2"), "2024-01-01T00:00:00.000002Z"));
        store.insert_record(&record("c", None, "2024-01-01T00:00:00.000003Z"));

        assert_eq!(store.delete_records_for_user("u1"), 1);
        assert!(store.list_records_for_user("u1").is_empty());
        assert_eq!(store.list_records_for_user("u2").len(), 1);
        assert_eq!(store.delete_records_for_user("u1"), 0);
    }
}
