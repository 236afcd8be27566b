// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! JWT signing and verification (RS256)
//!
//! This is the cryptographic boundary between [`TokenClaims`] and the
//! compact wire format. Verification is a pure function of the token
//! string, the public key and the current clock; it performs no I/O and
//! knows nothing about the allow-list.
//!
//! Algorithm handling is strict: only RS256 is accepted, so a token whose
//! header declares a symmetric algorithm is rejected with
//! [`TokenError::AlgorithmMismatch`] before any signature check. This
//! closes the classic confusion attack where an HS256 token is signed
//! with the public key used as a shared secret.
//!
//! Boundary inclusivity: with zero leeway, `verify` rejects a token when
//! `now > exp` and when `now < nbf`; a token presented at exactly `exp`
//! or exactly `nbf` is accepted.

mod claims;
mod keys;

pub use claims::TokenClaims;
pub use keys::{KeyError, KeyPair, TokenKeys};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

/// Errors raised by claim construction, signing and verification
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token TTL must be positive, got {minutes} minutes")]
    InvalidTtl { minutes: i64 },

    #[error("failed to sign token: {source}")]
    SigningFailed { source: jsonwebtoken::errors::Error },

    #[error("token declares an unexpected signing algorithm")]
    AlgorithmMismatch,

    #[error("token signature does not verify")]
    SignatureInvalid,

    #[error("token has expired")]
    TokenExpired,

    #[error("token is not yet valid")]
    TokenNotYetValid,

    #[error("token claims are malformed")]
    MalformedClaims,

    #[error("token is structurally invalid: {source}")]
    Malformed { source: jsonwebtoken::errors::Error },
}

/// Sign a claim set into a compact RS256 token string
pub fn sign(claims: &TokenClaims, key: &EncodingKey) -> Result<String, TokenError> {
    encode(&Header::new(Algorithm::RS256), claims, key)
        .map_err(|source| TokenError::SigningFailed { source })
}

/// Verify a compact token string against an RSA public key
///
/// Checks, in order: structural validity, declared algorithm, signature,
/// `exp` and `nbf` against the current clock with zero leeway. Returns
/// the decoded claims on success.
pub fn verify(token: &str, key: &DecodingKey) -> Result<TokenClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

    match decode::<TokenClaims>(token, key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) => Err(match e.into_kind() {
            ErrorKind::InvalidAlgorithm => TokenError::AlgorithmMismatch,
            ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
            ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
            ErrorKind::MissingRequiredClaim(_) => TokenError::MalformedClaims,
            other => TokenError::Malformed {
                source: other.into(),
            },
        }),
    }
}
