// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Authentication gate for protected requests
//!
//! Given the raw `Authorization` header value, the gate walks the full
//! admission chain: extract the bearer token, verify the RS256 signature
//! and time claims against the access public key, confirm the `jti` is
//! still allow-listed, resolve the owning user, and hand back an
//! [`AuthenticatedPrincipal`] for request-scoped state.
//!
//! Step order matters for what a caller can learn: every verification
//! failure collapses into [`AuthError::TokenVerification`] before the
//! store is ever consulted, so a probing client cannot distinguish an
//! expired token from a forged one.

use std::sync::Arc;
use uuid::Uuid;

use super::error::AuthError;
use super::jwt::{self, TokenKeys};
use super::session::SessionStore;
use crate::users::UserStore;

/// The outcome of a successful gate pass, attached to request state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub user_id: Uuid,
    /// The access token's `jti`; logout revokes by this id
    pub token_id: Uuid,
}

/// Gate guarding every protected operation
pub struct AuthGate {
    keys: Arc<TokenKeys>,
    store: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
}

impl AuthGate {
    pub fn new(
        keys: Arc<TokenKeys>,
        store: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        AuthGate { keys, store, users }
    }

    /// Admit or reject one request from its `Authorization` header value
    pub async fn authenticate(
        &self,
        bearer_header: Option<&str>,
    ) -> Result<AuthenticatedPrincipal, AuthError> {
        let header = bearer_header.filter(|h| !h.is_empty()).ok_or_else(|| {
            log::debug!("rejecting request without bearer token");
            AuthError::TokenMissing
        })?;
        let token = header.strip_prefix("Bearer ").unwrap_or(header);

        let claims = jwt::verify(token, &self.keys.access.decoding).map_err(|e| {
            log::debug!("token verification failed: {e}");
            AuthError::TokenVerification
        })?;
        let (token_id, user_id) = claims.extract().map_err(|_| AuthError::TokenVerification)?;

        // Membership check: revoked-at-logout and TTL-evicted look the same.
        self.store.confirm(token_id, user_id).await?;

        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(|e| AuthError::UserStoreFailure {
                reason: e.to_string(),
            })?
            .ok_or(AuthError::UserNotFound)?;

        // Unreachable given the checks above; kept as a defensive invariant.
        if user.id != user_id {
            log::warn!("resolved user {} does not match token subject {user_id}", user.id);
            return Err(AuthError::UserIdMismatch);
        }

        Ok(AuthenticatedPrincipal { user_id, token_id })
    }
}
