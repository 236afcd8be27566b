// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Token issuance and revocation
//!
//! Issuance is strictly sign, then register, then return: a token whose
//! allow-list entry could not be written is discarded and never reaches
//! the client, because its revocation state could never be checked later.
//! A cancellation between register and return leaves at worst a valid,
//! revocable entry behind, which is acceptable drift.

use std::sync::Arc;
use uuid::Uuid;

use super::error::AuthError;
use super::jwt::{self, KeyPair, TokenClaims, TokenKeys};
use super::session::SessionStore;
use crate::config::Config;

/// Which token classes a single `issue` call produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
    Both,
}

/// A signed, wire-ready token plus its metadata
///
/// Never persisted beyond the signed string itself; the only server-side
/// record of it is the allow-list entry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The compact JWT string
    pub compact: String,
    /// The `jti` under which the token is allow-listed
    pub token_id: Uuid,
    /// The owning user
    pub user_id: Uuid,
    /// Expiry, seconds since the Unix epoch
    pub expires_at: i64,
}

/// Instructions for the HTTP layer's refresh token cookie
///
/// The refresh token travels only in this HTTP-only cookie, never in a
/// response body.
#[derive(Debug, Clone)]
pub struct RefreshCookieSpec {
    /// Cookie name, always `refresh_token`
    pub name: &'static str,
    /// The compact refresh JWT
    pub value: String,
    /// Cookie lifetime in minutes, matching the token's validity window
    pub max_age_minutes: i64,
    pub http_only: bool,
    pub secure: bool,
    pub path: &'static str,
    pub domain: String,
}

/// The result of one `issue` call
#[derive(Debug, Clone, Default)]
pub struct IssuedSession {
    /// The access token, present for `Access` and `Both`
    pub access: Option<IssuedToken>,
    /// Cookie carrying the refresh token, present for `Refresh` and `Both`
    pub refresh_cookie: Option<RefreshCookieSpec>,
}

/// Token lifetimes and cookie attributes, fixed at startup
#[derive(Debug, Clone)]
pub struct TokenPolicy {
    /// Access token validity window in minutes
    pub access_max_age: i64,
    /// Refresh token validity window in minutes
    pub refresh_max_age: i64,
    /// Domain attribute of the refresh cookie
    pub cookie_domain: String,
    /// Whether the refresh cookie is `Secure`
    pub cookie_secure: bool,
}

impl TokenPolicy {
    pub fn from_config(config: &Config) -> Self {
        TokenPolicy {
            access_max_age: config.access_token_max_age,
            refresh_max_age: config.refresh_token_max_age,
            cookie_domain: config.domain.clone(),
            cookie_secure: config.cookie_secure,
        }
    }
}

/// Orchestrates signing and allow-list registration
pub struct TokenLifecycle {
    keys: Arc<TokenKeys>,
    store: Arc<dyn SessionStore>,
    policy: TokenPolicy,
}

impl TokenLifecycle {
    pub fn new(keys: Arc<TokenKeys>, store: Arc<dyn SessionStore>, policy: TokenPolicy) -> Self {
        TokenLifecycle { keys, store, policy }
    }

    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Issue the requested token classes for `user_id`
    ///
    /// Each class gets its own fresh `jti`, its own key pair and its own
    /// TTL. Concurrent calls for the same user are independent by design:
    /// multi-device sessions are allowed.
    pub async fn issue(&self, user_id: Uuid, kind: TokenKind) -> Result<IssuedSession, AuthError> {
        let mut session = IssuedSession::default();

        if matches!(kind, TokenKind::Access | TokenKind::Both) {
            let token = self
                .issue_one(user_id, &self.keys.access, self.policy.access_max_age)
                .await?;
            log::debug!("issued access token {} for user {}", token.token_id, user_id);
            session.access = Some(token);
        }

        if matches!(kind, TokenKind::Refresh | TokenKind::Both) {
            let token = self
                .issue_one(user_id, &self.keys.refresh, self.policy.refresh_max_age)
                .await?;
            log::debug!("issued refresh token {} for user {}", token.token_id, user_id);
            session.refresh_cookie = Some(RefreshCookieSpec {
                name: "refresh_token",
                value: token.compact,
                max_age_minutes: self.policy.refresh_max_age,
                http_only: true,
                secure: self.policy.cookie_secure,
                path: "/",
                domain: self.policy.cookie_domain.clone(),
            });
        }

        Ok(session)
    }

    /// Revoke both halves of a session, best-effort
    ///
    /// Each deletion is attempted even if the other fails; the first
    /// failure is reported so the caller knows the session may have been
    /// left partially revoked.
    pub async fn revoke_session(
        &self,
        access_token_id: Uuid,
        refresh_token_id: Uuid,
    ) -> Result<(), AuthError> {
        let mut first_failure = None;

        for token_id in [access_token_id, refresh_token_id] {
            if let Err(e) = self.store.revoke(token_id).await {
                log::error!("failed to revoke session entry {token_id}: {e}");
                first_failure.get_or_insert(e);
            }
        }

        match first_failure {
            None => Ok(()),
            Some(e) => Err(e.into()),
        }
    }

    /// Sign one token and register it before letting it out
    async fn issue_one(
        &self,
        user_id: Uuid,
        keys: &KeyPair,
        ttl_minutes: i64,
    ) -> Result<IssuedToken, AuthError> {
        let claims = TokenClaims::build(user_id, ttl_minutes).map_err(|e| AuthError::Issuance {
            reason: e.to_string(),
        })?;
        let (token_id, _) = claims.extract().map_err(|e| AuthError::Issuance {
            reason: e.to_string(),
        })?;

        let compact = jwt::sign(&claims, &keys.encoding).map_err(|e| AuthError::Issuance {
            reason: e.to_string(),
        })?;

        // Registration failure discards the signed token; see module docs.
        self.store.register(token_id, user_id, ttl_minutes).await?;

        Ok(IssuedToken {
            compact,
            token_id,
            user_id,
            expires_at: claims.exp,
        })
    }
}
