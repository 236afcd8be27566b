// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Closed error taxonomy for the authentication surface
//!
//! Every failure the HTTP layer can see is one of these kinds, with an
//! explicit kind-to-status table. Credential failures collapse into a
//! single generic client message: the response never tells a caller
//! whether their token was expired, forged or revoked.

use thiserror::Error;

use super::session::SessionStoreError;

/// Everything that can go wrong behind `issue`, `authenticate` and `revoke`
#[derive(Error, Debug)]
pub enum AuthError {
    /// No bearer token or refresh cookie was presented
    #[error("no authentication token provided")]
    TokenMissing,

    /// Signature, algorithm, expiry, not-before or claim-shape failure.
    /// One kind on purpose: the caller must not learn which check failed.
    #[error("token verification failed")]
    TokenVerification,

    /// Token verified but its allow-list entry is gone (revoked or
    /// TTL-evicted; the two are indistinguishable)
    #[error("session not found")]
    SessionNotFound,

    /// Allow-list entry exists but does not match the token's subject
    #[error("session entry does not match token")]
    SessionMismatch,

    /// Token subject does not resolve to a known user
    #[error("user not found")]
    UserNotFound,

    /// Resolved user's id differs from the token subject. Unreachable
    /// given the earlier checks, kept as a defensive invariant.
    #[error("user identity mismatch")]
    UserIdMismatch,

    /// The session store could not be reached
    #[error("session store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// The user store collaborator failed
    #[error("user store failure: {reason}")]
    UserStoreFailure { reason: String },

    /// Signing or registration failed while issuing; the request fails
    /// whole and no partial token is ever returned
    #[error("token issuance failed: {reason}")]
    Issuance { reason: String },
}

impl AuthError {
    /// The HTTP status the excluded routing layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::TokenMissing
            | AuthError::TokenVerification
            | AuthError::SessionNotFound
            | AuthError::SessionMismatch => 401,
            AuthError::UserNotFound => 404,
            AuthError::UserIdMismatch => 409,
            AuthError::StoreUnavailable { .. } => 503,
            AuthError::UserStoreFailure { .. } | AuthError::Issuance { .. } => 500,
        }
    }

    /// True for failures of the credential itself rather than of the
    /// infrastructure behind it
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == 401
    }

    /// The message shown to the caller
    ///
    /// Uniform for every 401 so that probing cannot distinguish failure
    /// modes; specific for the rest.
    pub fn client_message(&self) -> &'static str {
        match self {
            e if e.is_unauthorized() => {
                "Your session has expired or the token is invalid. Please log in again."
            }
            AuthError::UserNotFound => {
                "No user found with the provided information. Please check your input and try again."
            }
            AuthError::UserIdMismatch => {
                "You are not authorized to perform this action with this account."
            }
            AuthError::StoreUnavailable { .. } => {
                "We couldn't reach the session service. Please try again later."
            }
            _ => "Internal server error. Please try again later or contact support.",
        }
    }
}

impl From<SessionStoreError> for AuthError {
    fn from(e: SessionStoreError) -> Self {
        match e {
            SessionStoreError::EntryNotFound => AuthError::SessionNotFound,
            SessionStoreError::EntryMismatch => AuthError::SessionMismatch,
            SessionStoreError::Unavailable { reason } => AuthError::StoreUnavailable { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_failures_share_status_and_message() {
        let kinds = [
            AuthError::TokenMissing,
            AuthError::TokenVerification,
            AuthError::SessionNotFound,
            AuthError::SessionMismatch,
        ];
        for kind in &kinds {
            assert_eq!(kind.status_code(), 401);
            assert_eq!(kind.client_message(), kinds[0].client_message());
        }
    }

    #[test]
    fn test_infrastructure_failures_are_distinguishable() {
        let unavailable = AuthError::StoreUnavailable {
            reason: "connection refused".into(),
        };
        assert_eq!(unavailable.status_code(), 503);
        assert!(!unavailable.is_unauthorized());

        let issuance = AuthError::Issuance {
            reason: "signing failed".into(),
        };
        assert_eq!(issuance.status_code(), 500);
    }
}
