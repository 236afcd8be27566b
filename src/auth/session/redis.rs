// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Redis-backed allow-list implementation
//!
//! Entries are plain string pairs: key = `jti` UUID, value = user UUID,
//! written with `SET ... EX` so Redis evicts them when the token's own
//! lifetime elapses. A single multiplexed connection is established at
//! startup and cloned per operation; the connection is safe for
//! concurrent use across request tasks.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use uuid::Uuid;

use super::{SessionStore, SessionStoreError};

/// Allow-list backed by a single Redis instance
pub struct RedisSessionStore {
    connection: MultiplexedConnection,
}

impl RedisSessionStore {
    /// Connect to Redis and verify the connection with a round-trip
    ///
    /// Connection failure here is fatal at startup; the process must not
    /// come up unable to check revocation state.
    pub async fn connect(url: &str) -> Result<Self, SessionStoreError> {
        let client = redis::Client::open(url).map_err(unavailable)?;
        let mut connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(unavailable)?;

        let _: String = redis::cmd("PING")
            .query_async(&mut connection)
            .await
            .map_err(unavailable)?;
        log::info!("connected to session store at {url}");

        Ok(RedisSessionStore { connection })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn register(
        &self,
        token_id: Uuid,
        user_id: Uuid,
        ttl_minutes: i64,
    ) -> Result<(), SessionStoreError> {
        let mut conn = self.connection.clone();
        let ttl_seconds = (ttl_minutes as u64) * 60;
        let _: () = conn
            .set_ex(token_id.to_string(), user_id.to_string(), ttl_seconds)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn lookup(&self, token_id: Uuid) -> Result<Uuid, SessionStoreError> {
        let mut conn = self.connection.clone();
        let stored: Option<String> = conn
            .get(token_id.to_string())
            .await
            .map_err(unavailable)?;

        let stored = stored.ok_or(SessionStoreError::EntryNotFound)?;
        // A value that is not a user UUID means the entry was not written
        // by this subsystem; surface it as a mismatch, not a match.
        Uuid::parse_str(&stored).map_err(|_| SessionStoreError::EntryMismatch)
    }

    async fn revoke(&self, token_id: Uuid) -> Result<(), SessionStoreError> {
        let mut conn = self.connection.clone();
        let _: () = conn
            .del(token_id.to_string())
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}

fn unavailable(e: redis::RedisError) -> SessionStoreError {
    SessionStoreError::Unavailable {
        reason: e.to_string(),
    }
}
