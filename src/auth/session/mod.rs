// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Revocable session allow-list
//!
//! Every issued token is registered here under its `jti`, mapping to the
//! owning user id, with a TTL equal to the token's own validity window.
//! An entry exists if and only if the server still considers the token
//! valid: logout deletes the entry, natural expiry evicts it, and a token
//! without an entry is dead no matter how good its signature is.

mod memory;
mod redis;

pub use memory::MemorySessionStore;
pub use redis::RedisSessionStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by allow-list operations
#[derive(Error, Debug)]
pub enum SessionStoreError {
    /// No entry for the token id: never issued, revoked, or TTL-evicted.
    /// The three cases are deliberately indistinguishable.
    #[error("no session entry for this token")]
    EntryNotFound,

    /// An entry exists but its stored user does not match the token's
    /// subject. This should be unreachable and is treated as a
    /// security-relevant anomaly, never silently accepted.
    #[error("session entry does not match the token's subject")]
    EntryMismatch,

    /// The backing store could not be reached. Infrastructure failure,
    /// not a bad credential.
    #[error("session store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// The allow-list contract
///
/// Keyed by token id, valued by owning user id. `register` and `revoke`
/// for the same key are safe to race: registration always writes a fresh
/// random key, and deletion is idempotent.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create the entry for a newly signed token, expiring after
    /// `ttl_minutes`. The TTL must equal the token's validity window so
    /// the entry and the JWT expire together.
    async fn register(
        &self,
        token_id: Uuid,
        user_id: Uuid,
        ttl_minutes: i64,
    ) -> Result<(), SessionStoreError>;

    /// Resolve the owning user for a token id
    async fn lookup(&self, token_id: Uuid) -> Result<Uuid, SessionStoreError>;

    /// Delete the entry. Idempotent: revoking an absent entry succeeds.
    async fn revoke(&self, token_id: Uuid) -> Result<(), SessionStoreError>;

    /// Look up the entry and check it against the expected association
    ///
    /// The stored value is compared for equality with the token's own
    /// subject as a defense-in-depth integrity check, not mere existence.
    async fn confirm(&self, token_id: Uuid, expected_user: Uuid) -> Result<(), SessionStoreError> {
        let stored = self.lookup(token_id).await?;
        if stored != expected_user {
            log::warn!("allow-list entry for {token_id} does not match token subject");
            return Err(SessionStoreError::EntryMismatch);
        }
        Ok(())
    }
}
