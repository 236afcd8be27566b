// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! User store collaborator
//!
//! The relational user store lives outside this crate; the gate and the
//! session flows only need lookups, so that is all the trait asks for.
//! `MemoryUserStore` backs the tests and single-process embedders.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use uuid::Uuid;

/// A stored user, as the backing relational store shapes it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// OAuth provider name (`google`, `github`) for federated accounts
    pub provider: Option<String>,
    /// The user's identifier at the provider
    pub provider_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum UserStoreError {
    #[error("user store failure: {reason}")]
    Backend { reason: String },
}

/// Lookup capabilities the auth subsystem needs from the user store
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, UserStoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserStoreError>;

    /// Resolve a federated account by provider name and provider-side id
    async fn find_by_provider(
        &self,
        provider: &str,
        provider_id: &str,
    ) -> Result<Option<UserRecord>, UserStoreError>;
}

/// Process-local user store
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: UserRecord) {
        self.users.write().unwrap().insert(user.id, user);
    }

    pub fn remove(&self, id: Uuid) {
        self.users.write().unwrap().remove(&id);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, UserStoreError> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserStoreError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_provider(
        &self,
        provider: &str,
        provider_id: &str,
    ) -> Result<Option<UserRecord>, UserStoreError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| {
                u.provider.as_deref() == Some(provider)
                    && u.provider_id.as_deref() == Some(provider_id)
            })
            .cloned())
    }
}
