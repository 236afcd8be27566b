// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! JWT claim set construction and extraction

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TokenError;

/// The claim set carried by every issued token
///
/// `jti` is a freshly generated v4 UUID on every issuance; no two tokens
/// ever share one, even for the same user. `iat` and `nbf` are identical
/// (tokens are valid immediately) and `exp = iat + ttl_minutes * 60`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the owning user's UUID in string form
    pub sub: String,
    /// Token identifier, the allow-list key
    pub jti: String,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
    /// Not-before, always equal to `iat`
    pub nbf: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

impl TokenClaims {
    /// Build a fresh claim set for `user_id` valid for `ttl_minutes`
    ///
    /// A non-positive TTL is a configuration error surfaced at startup,
    /// never a per-request condition.
    pub fn build(user_id: Uuid, ttl_minutes: i64) -> Result<Self, TokenError> {
        if ttl_minutes <= 0 {
            return Err(TokenError::InvalidTtl {
                minutes: ttl_minutes,
            });
        }

        let now = Utc::now();
        let issued_at = now.timestamp();
        let expires_at = (now + Duration::minutes(ttl_minutes)).timestamp();

        Ok(TokenClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: issued_at,
            nbf: issued_at,
            exp: expires_at,
        })
    }

    /// Parse the token identifier and subject back into UUIDs
    ///
    /// Returns `(token_id, user_id)`. A claim that survived signature
    /// verification but does not parse indicates tampering or a decoding
    /// bug; it is a hard failure, never silently defaulted.
    pub fn extract(&self) -> Result<(Uuid, Uuid), TokenError> {
        let token_id = Uuid::parse_str(&self.jti).map_err(|_| TokenError::MalformedClaims)?;
        let user_id = Uuid::parse_str(&self.sub).map_err(|_| TokenError::MalformedClaims)?;
        Ok((token_id, user_id))
    }
}
