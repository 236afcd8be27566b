// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! OAuth2 client registration values

use serde::{Deserialize, Serialize};

/// Credentials and redirect target for one OAuth2 provider registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthClientConfig {
    /// The client identifier issued by the provider
    pub client_id: String,

    /// The client secret issued by the provider
    pub client_secret: String,

    /// Callback URL registered with the provider
    pub redirect_url: String,
}
