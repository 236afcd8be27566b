// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! tokengate - JWT session issuance, verification and Redis-backed revocation
//!
//! The core of an authentication backend: RS256 token pairs (short-lived
//! access, long-lived refresh), a Redis allow-list keyed by token id that
//! makes logout effective before cryptographic expiry, and the gate that
//! admits or rejects every protected request.
//!
//! The HTTP routing layer, password hashing and the relational user store
//! are external collaborators; the crate exposes three operations for
//! them to compose:
//!
//! - [`auth::TokenLifecycle::issue`] after a successful login,
//!   registration or OAuth callback
//! - [`auth::AuthGate::authenticate`] in front of every protected route
//! - [`auth::TokenLifecycle::revoke_session`] (via
//!   [`auth::SessionFlow::logout`]) on logout
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokengate::auth::{AuthGate, RedisSessionStore, TokenKeys, TokenKind, TokenLifecycle, TokenPolicy};
//! use tokengate::config::Config;
//! use tokengate::users::MemoryUserStore;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let keys = Arc::new(TokenKeys::from_config(&config)?);
//! let store = Arc::new(RedisSessionStore::connect(&config.redis_url).await?);
//! let users = Arc::new(MemoryUserStore::new());
//!
//! let lifecycle = TokenLifecycle::new(keys.clone(), store.clone(), TokenPolicy::from_config(&config));
//! let gate = AuthGate::new(keys, store, users);
//!
//! let session = lifecycle.issue(uuid::Uuid::new_v4(), TokenKind::Both).await?;
//! let access = session.access.unwrap();
//! let principal = gate
//!     .authenticate(Some(&format!("Bearer {}", access.compact)))
//!     .await?;
//! assert_eq!(principal.user_id, access.user_id);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod oauth;
pub mod users;

pub use auth::{AuthError, AuthGate, AuthenticatedPrincipal, SessionFlow, TokenLifecycle};
pub use config::Config;
