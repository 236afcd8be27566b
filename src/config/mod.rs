// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Application configuration loaded from the process environment
//!
//! All key material, token lifetimes and backing-store addresses are read
//! once at startup. A missing or malformed value is a fatal error: the
//! process never starts with a partially usable token subsystem.
//!
//! Token lifetimes (`ACCESS_TOKEN_MAXAGE`, `REFRESH_TOKEN_MAXAGE`) are
//! duration-like strings such as `15m` or `60`; only the leading run of
//! decimal digits is interpreted, as minutes. An empty numeric part is a
//! configuration error.

mod oauth;

pub use oauth::OAuthClientConfig;

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Errors raised while assembling the configuration at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {name} must be set")]
    MissingVar { name: &'static str },

    #[error("invalid {name}: no leading digits in duration string {value:?}")]
    InvalidMaxAge { name: &'static str, value: String },
}

/// Complete startup configuration for the token subsystem
///
/// Key material is carried as base64-encoded PEM; it is decoded and parsed
/// once by [`crate::auth::jwt::TokenKeys::from_config`], which is where a
/// malformed key becomes a fatal error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Redis connection URL for the session allow-list
    pub redis_url: String,

    /// Origin of the browser client, used for CORS by the HTTP layer
    pub client_origin: String,

    /// Cookie domain for the refresh token cookie
    pub domain: String,

    /// Whether the refresh token cookie carries the `Secure` attribute
    pub cookie_secure: bool,

    /// Base64-encoded PEM RSA private key used to sign access tokens
    pub access_token_private_key: String,

    /// Base64-encoded PEM RSA public key used to verify access tokens
    pub access_token_public_key: String,

    /// Access token validity window in minutes
    pub access_token_max_age: i64,

    /// Base64-encoded PEM RSA private key used to sign refresh tokens
    pub refresh_token_private_key: String,

    /// Base64-encoded PEM RSA public key used to verify refresh tokens
    pub refresh_token_public_key: String,

    /// Refresh token validity window in minutes
    pub refresh_token_max_age: i64,

    /// OAuth2 client registration for Google
    pub google: OAuthClientConfig,

    /// OAuth2 client registration for GitHub
    pub github: OAuthClientConfig,
}

impl Config {
    /// Load the configuration from the process environment
    ///
    /// Reads a `.env` file first when one is present, then resolves every
    /// required variable. Returns an error naming the first missing or
    /// malformed value.
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenv::dotenv().is_err() {
            log::warn!("No .env file found, using system environment variables");
        }

        let access_token_max_age = parse_max_age("ACCESS_TOKEN_MAXAGE", &require("ACCESS_TOKEN_MAXAGE")?)?;
        let refresh_token_max_age =
            parse_max_age("REFRESH_TOKEN_MAXAGE", &require("REFRESH_TOKEN_MAXAGE")?)?;

        Ok(Config {
            redis_url: require("REDIS_URL")?,
            client_origin: require("CLIENT_ORIGIN")?,
            domain: require("DOMAIN")?,
            cookie_secure: env::var("COOKIE_SECURE").map(|v| v == "true").unwrap_or(false),
            access_token_private_key: require("ACCESS_TOKEN_PRIVATE_KEY")?,
            access_token_public_key: require("ACCESS_TOKEN_PUBLIC_KEY")?,
            access_token_max_age,
            refresh_token_private_key: require("REFRESH_TOKEN_PRIVATE_KEY")?,
            refresh_token_public_key: require("REFRESH_TOKEN_PUBLIC_KEY")?,
            refresh_token_max_age,
            google: OAuthClientConfig {
                client_id: require("GOOGLE_CLIENT_ID")?,
                client_secret: require("GOOGLE_CLIENT_SECRET")?,
                redirect_url: "http://localhost:8080/auth/google/callback".to_string(),
            },
            github: OAuthClientConfig {
                client_id: require("GITHUB_CLIENT_ID")?,
                client_secret: require("GITHUB_CLIENT_SECRET")?,
                redirect_url: "http://localhost:8080/auth/github/callback".to_string(),
            },
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar { name }),
    }
}

/// Parse a duration-like string (`15m`, `60`, `30 minutes`) into minutes
///
/// Only the leading run of decimal digits counts; any suffix is ignored.
fn parse_max_age(name: &'static str, value: &str) -> Result<i64, ConfigError> {
    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().map_err(|_| ConfigError::InvalidMaxAge {
        name,
        value: value.to_string(),
    })
}
