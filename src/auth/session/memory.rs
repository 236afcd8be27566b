// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! In-memory allow-list for tests and single-process embedders

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::{SessionStore, SessionStoreError};

struct Entry {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// Allow-list held in a process-local map with lazy expiry
///
/// Expired entries are treated as absent at lookup time, matching the
/// Redis implementation's TTL eviction.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<Uuid, Entry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn register(
        &self,
        token_id: Uuid,
        user_id: Uuid,
        ttl_minutes: i64,
    ) -> Result<(), SessionStoreError> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            token_id,
            Entry {
                user_id,
                expires_at: Utc::now() + Duration::minutes(ttl_minutes),
            },
        );
        Ok(())
    }

    async fn lookup(&self, token_id: Uuid) -> Result<Uuid, SessionStoreError> {
        let entries = self.entries.lock().unwrap();
        match entries.get(&token_id) {
            Some(entry) if entry.expires_at > Utc::now() => Ok(entry.user_id),
            _ => Err(SessionStoreError::EntryNotFound),
        }
    }

    async fn revoke(&self, token_id: Uuid) -> Result<(), SessionStoreError> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(&token_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_then_lookup() {
        let store = MemorySessionStore::new();
        let token_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        store.register(token_id, user_id, 15).await.unwrap();
        assert_eq!(store.lookup(token_id).await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_lookup_absent_entry() {
        let store = MemorySessionStore::new();
        assert!(matches!(
            store.lookup(Uuid::new_v4()).await,
            Err(SessionStoreError::EntryNotFound)
        ));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let store = MemorySessionStore::new();
        let token_id = Uuid::new_v4();
        store.register(token_id, Uuid::new_v4(), 15).await.unwrap();

        store.revoke(token_id).await.unwrap();
        store.revoke(token_id).await.unwrap();
        assert!(store.lookup(token_id).await.is_err());
    }

    #[tokio::test]
    async fn test_confirm_detects_mismatch() {
        let store = MemorySessionStore::new();
        let token_id = Uuid::new_v4();
        store.register(token_id, Uuid::new_v4(), 15).await.unwrap();

        assert!(matches!(
            store.confirm(token_id, Uuid::new_v4()).await,
            Err(SessionStoreError::EntryMismatch)
        ));
    }
}
