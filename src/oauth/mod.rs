// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! OAuth2 provider registry
//!
//! A closed set of providers dispatched through one registry, each
//! offering the same capability set: build the authorization URL,
//! exchange an authorization code for a provider access token, and fetch
//! the user's profile with it. The surrounding authorization-code dance
//! (redirects, state cookies) belongs to the HTTP layer.

use reqwest::Client;
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::config::{Config, OAuthClientConfig};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const GOOGLE_SCOPES: &str = "https://www.googleapis.com/auth/userinfo.email https://www.googleapis.com/auth/userinfo.profile";

const GITHUB_AUTH_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_USER_URL: &str = "https://api.github.com/user";
const GITHUB_SCOPES: &str = "read:user user:email";

/// The providers this backend federates with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    GitHub,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::GitHub => "github",
        }
    }
}

impl FromStr for Provider {
    type Err = OAuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Provider::Google),
            "github" => Ok(Provider::GitHub),
            other => Err(OAuthError::UnknownProvider {
                provider: other.to_string(),
            }),
        }
    }
}

#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("unknown OAuth provider: {provider}")]
    UnknownProvider { provider: String },

    #[error("failed to exchange authorization code with {provider}: {reason}")]
    ExchangeFailed { provider: &'static str, reason: String },

    #[error("failed to fetch user profile from {provider}: {reason}")]
    ProfileFetchFailed { provider: &'static str, reason: String },
}

/// A provider-side user profile, normalized across providers
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthProfile {
    /// The user's identifier at the provider, in string form
    pub provider_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct GoogleUserInfo {
    id: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Deserialize)]
struct GitHubUser {
    id: i64,
    email: Option<String>,
    name: Option<String>,
    avatar_url: Option<String>,
}

/// Dispatches the shared capability set over the configured providers
pub struct ProviderRegistry {
    google: OAuthClientConfig,
    github: OAuthClientConfig,
    http: Client,
}

impl ProviderRegistry {
    pub fn from_config(config: &Config) -> Self {
        ProviderRegistry {
            google: config.google.clone(),
            github: config.github.clone(),
            http: Client::new(),
        }
    }

    fn client(&self, provider: Provider) -> &OAuthClientConfig {
        match provider {
            Provider::Google => &self.google,
            Provider::GitHub => &self.github,
        }
    }

    /// Build the URL the browser is redirected to for consent
    pub fn authorize_url(&self, provider: Provider, state: &str) -> Url {
        let client = self.client(provider);
        let (base, scopes) = match provider {
            Provider::Google => (GOOGLE_AUTH_URL, GOOGLE_SCOPES),
            Provider::GitHub => (GITHUB_AUTH_URL, GITHUB_SCOPES),
        };

        let mut url = Url::parse(base).expect("provider authorize URL is valid");
        url.query_pairs_mut()
            .append_pair("client_id", &client.client_id)
            .append_pair("redirect_uri", &client.redirect_url)
            .append_pair("response_type", "code")
            .append_pair("scope", scopes)
            .append_pair("state", state);
        url
    }

    /// Exchange an authorization code for a provider access token
    pub async fn exchange_code(
        &self,
        provider: Provider,
        code: &str,
    ) -> Result<String, OAuthError> {
        let client = self.client(provider);
        let token_url = match provider {
            Provider::Google => GOOGLE_TOKEN_URL,
            Provider::GitHub => GITHUB_TOKEN_URL,
        };

        let exchange_failed = |reason: String| OAuthError::ExchangeFailed {
            provider: provider.as_str(),
            reason,
        };

        let response = self
            .http
            .post(token_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", client.client_id.as_str()),
                ("client_secret", client.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", client.redirect_url.as_str()),
            ])
            .send()
            .await
            .map_err(|e| exchange_failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(exchange_failed(format!("status {}", response.status())));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| exchange_failed(e.to_string()))?;
        Ok(token.access_token)
    }

    /// Fetch the user's profile with a provider access token
    pub async fn fetch_profile(
        &self,
        provider: Provider,
        access_token: &str,
    ) -> Result<OAuthProfile, OAuthError> {
        let fetch_failed = |reason: String| OAuthError::ProfileFetchFailed {
            provider: provider.as_str(),
            reason,
        };

        match provider {
            Provider::Google => {
                let info: GoogleUserInfo = self
                    .http
                    .get(GOOGLE_USERINFO_URL)
                    .bearer_auth(access_token)
                    .send()
                    .await
                    .map_err(|e| fetch_failed(e.to_string()))?
                    .json()
                    .await
                    .map_err(|e| fetch_failed(e.to_string()))?;

                Ok(OAuthProfile {
                    provider_id: info.id,
                    email: info.email,
                    name: info.name,
                    picture: info.picture,
                })
            }
            Provider::GitHub => {
                let user: GitHubUser = self
                    .http
                    .get(GITHUB_USER_URL)
                    .bearer_auth(access_token)
                    // GitHub's API rejects requests without a User-Agent
                    .header("User-Agent", "tokengate")
                    .header("Accept", "application/vnd.github+json")
                    .send()
                    .await
                    .map_err(|e| fetch_failed(e.to_string()))?
                    .json()
                    .await
                    .map_err(|e| fetch_failed(e.to_string()))?;

                Ok(OAuthProfile {
                    provider_id: user.id.to_string(),
                    email: user.email,
                    name: user.name,
                    picture: user.avatar_url,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_registry() -> ProviderRegistry {
        ProviderRegistry {
            google: OAuthClientConfig {
                client_id: "google-client".into(),
                client_secret: "google-secret".into(),
                redirect_url: "http://localhost:8080/auth/google/callback".into(),
            },
            github: OAuthClientConfig {
                client_id: "github-client".into(),
                client_secret: "github-secret".into(),
                redirect_url: "http://localhost:8080/auth/github/callback".into(),
            },
            http: Client::new(),
        }
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("google".parse::<Provider>().unwrap(), Provider::Google);
        assert_eq!("github".parse::<Provider>().unwrap(), Provider::GitHub);
        assert!("gitlab".parse::<Provider>().is_err());
    }

    #[test]
    fn test_authorize_url_carries_client_and_state() {
        let registry = test_registry();
        let url = registry.authorize_url(Provider::Google, "xyzzy");

        assert!(url.as_str().starts_with(GOOGLE_AUTH_URL));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("client_id".into(), "google-client".into())));
        assert!(pairs.contains(&("state".into(), "xyzzy".into())));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
    }

    #[test]
    fn test_authorize_url_uses_provider_endpoints() {
        let registry = test_registry();
        let url = registry.authorize_url(Provider::GitHub, "s");
        assert!(url.as_str().starts_with(GITHUB_AUTH_URL));
    }
}
