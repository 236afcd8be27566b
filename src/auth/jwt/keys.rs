// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! RSA key material for token signing and verification
//!
//! Configuration carries keys as base64-encoded PEM so they survive being
//! stuffed into environment variables. This module decodes them once at
//! startup into [`jsonwebtoken`] key handles; each token class (access,
//! refresh) gets its own pair and the two classes never share material, so
//! a refresh token can never validate against the access public key.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use jsonwebtoken::{DecodingKey, EncodingKey};
use thiserror::Error;

use crate::config::Config;

/// Errors raised while decoding configured key material
///
/// Any of these is a fatal startup error: the process must not come up
/// with keys it cannot sign or verify with.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("failed to decode {which} key from base64: {source}")]
    Base64 {
        which: &'static str,
        source: base64::DecodeError,
    },

    #[error("{which} key is not a valid RSA PEM key: {source}")]
    InvalidPem {
        which: &'static str,
        source: jsonwebtoken::errors::Error,
    },
}

/// One RSA key pair: private side for signing, public side for verification
pub struct KeyPair {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl KeyPair {
    /// Build a pair from base64-encoded PEM private and public keys
    pub fn from_base64_pem(
        which: &'static str,
        private_b64: &str,
        public_b64: &str,
    ) -> Result<Self, KeyError> {
        let private_pem = BASE64_STANDARD
            .decode(private_b64)
            .map_err(|source| KeyError::Base64 { which, source })?;
        let public_pem = BASE64_STANDARD
            .decode(public_b64)
            .map_err(|source| KeyError::Base64 { which, source })?;

        let encoding = EncodingKey::from_rsa_pem(&private_pem)
            .map_err(|source| KeyError::InvalidPem { which, source })?;
        let decoding = DecodingKey::from_rsa_pem(&public_pem)
            .map_err(|source| KeyError::InvalidPem { which, source })?;

        Ok(KeyPair { encoding, decoding })
    }
}

/// The full key material for both token classes
///
/// Immutable after startup; shared by reference with every component that
/// signs or verifies (no ambient globals).
pub struct TokenKeys {
    /// Pair used for short-lived access tokens
    pub access: KeyPair,
    /// Pair used for long-lived refresh tokens
    pub refresh: KeyPair,
}

impl TokenKeys {
    /// Decode both configured key pairs
    pub fn from_config(config: &Config) -> Result<Self, KeyError> {
        Ok(TokenKeys {
            access: KeyPair::from_base64_pem(
                "access",
                &config.access_token_private_key,
                &config.access_token_public_key,
            )?,
            refresh: KeyPair::from_base64_pem(
                "refresh",
                &config.refresh_token_private_key,
                &config.refresh_token_public_key,
            )?,
        })
    }
}
