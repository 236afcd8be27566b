// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Token issuance, verification and session revocation
//!
//! The subsystem splits along the spec's component lines:
//!
//! - [`jwt`] - claim construction, RS256 signing and verification
//! - [`session`] - the Redis-backed revocable allow-list
//! - [`lifecycle`] - issuance and revocation orchestration
//! - [`gate`] - bearer-token admission for protected requests
//! - [`flow`] - refresh and logout over the refresh cookie
//! - [`error`] - the closed error taxonomy and its status table

pub mod error;
pub mod flow;
pub mod gate;
pub mod jwt;
pub mod lifecycle;
pub mod session;

pub use error::AuthError;
pub use flow::{LogoutOutcome, SessionFlow};
pub use gate::{AuthGate, AuthenticatedPrincipal};
pub use jwt::{TokenClaims, TokenError, TokenKeys};
pub use lifecycle::{IssuedSession, IssuedToken, RefreshCookieSpec, TokenKind, TokenLifecycle, TokenPolicy};
pub use session::{MemorySessionStore, RedisSessionStore, SessionStore, SessionStoreError};
