// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Session refresh and logout flows
//!
//! These are the cookie-side halves of the login state machine. Refresh
//! turns a valid, still allow-listed refresh cookie into a fresh access
//! token; logout tears down both allow-list entries, after which both
//! tokens are dead even though they remain cryptographically valid until
//! natural expiry.

use std::sync::Arc;
use uuid::Uuid;

use super::error::AuthError;
use super::gate::AuthenticatedPrincipal;
use super::jwt::{self, TokenKeys};
use super::lifecycle::{IssuedSession, TokenKind, TokenLifecycle};
use super::session::SessionStore;
use crate::users::UserStore;

/// What the HTTP layer must do after a successful logout
#[derive(Debug, Clone)]
pub struct LogoutOutcome {
    /// Cookie names to clear on the response
    pub clear_cookies: &'static [&'static str],
}

/// Refresh and logout over the refresh token cookie
pub struct SessionFlow {
    keys: Arc<TokenKeys>,
    store: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
    lifecycle: TokenLifecycle,
}

impl SessionFlow {
    pub fn new(
        keys: Arc<TokenKeys>,
        store: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
        lifecycle: TokenLifecycle,
    ) -> Self {
        SessionFlow {
            keys,
            store,
            users,
            lifecycle,
        }
    }

    pub fn lifecycle(&self) -> &TokenLifecycle {
        &self.lifecycle
    }

    /// Exchange a refresh cookie for a fresh access token
    ///
    /// The refresh token itself stays valid and allow-listed; only a new
    /// access token is issued.
    pub async fn refresh(&self, refresh_cookie: Option<&str>) -> Result<IssuedSession, AuthError> {
        let (_, user_id) = self.verify_refresh_cookie(refresh_cookie).await?;

        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(|e| AuthError::UserStoreFailure {
                reason: e.to_string(),
            })?
            .ok_or(AuthError::UserNotFound)?;
        if user.id != user_id {
            return Err(AuthError::UserIdMismatch);
        }

        self.lifecycle.issue(user.id, TokenKind::Access).await
    }

    /// Revoke both halves of the session
    ///
    /// Best-effort per the lifecycle contract: a store failure may leave
    /// the session partially revoked, and the error says so.
    pub async fn logout(
        &self,
        principal: &AuthenticatedPrincipal,
        refresh_cookie: Option<&str>,
    ) -> Result<LogoutOutcome, AuthError> {
        let cookie = refresh_cookie
            .filter(|c| !c.is_empty())
            .ok_or(AuthError::TokenMissing)?;
        let claims = jwt::verify(cookie, &self.keys.refresh.decoding)
            .map_err(|_| AuthError::TokenVerification)?;
        let (refresh_token_id, _) = claims.extract().map_err(|_| AuthError::TokenVerification)?;

        self.lifecycle
            .revoke_session(principal.token_id, refresh_token_id)
            .await?;
        log::info!("user {} logged out", principal.user_id);

        Ok(LogoutOutcome {
            clear_cookies: &["refresh_token", "access_token"],
        })
    }

    /// Verify the refresh cookie and confirm its allow-list membership
    async fn verify_refresh_cookie(
        &self,
        refresh_cookie: Option<&str>,
    ) -> Result<(Uuid, Uuid), AuthError> {
        let cookie = refresh_cookie
            .filter(|c| !c.is_empty())
            .ok_or(AuthError::TokenMissing)?;

        let claims = jwt::verify(cookie, &self.keys.refresh.decoding).map_err(|e| {
            log::debug!("refresh token verification failed: {e}");
            AuthError::TokenVerification
        })?;
        let (token_id, user_id) = claims.extract().map_err(|_| AuthError::TokenVerification)?;

        self.store.confirm(token_id, user_id).await?;
        Ok((token_id, user_id))
    }
}
