// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Shared helpers for integration tests

// Not every test binary uses every helper.
#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use std::sync::{Arc, Once, OnceLock};

use tokengate::auth::jwt::{KeyPair, TokenKeys};
use tokengate::auth::TokenPolicy;

static INIT: Once = Once::new();

/// Setup logger for tests
pub fn setup() {
    INIT.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

/// Generate one RS256 key pair as base64-encoded PEM, the form the
/// configuration carries
fn generate_base64_pem_pair() -> (String, String) {
    let mut rng = rsa::rand_core::OsRng;
    let private_key =
        rsa::RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate RSA private key");
    let public_key = rsa::RsaPublicKey::from(&private_key);

    let private_pem = private_key
        .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
        .expect("Failed to convert private key to PEM");
    let public_pem = public_key
        .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
        .expect("Failed to convert public key to PEM");

    (
        BASE64_STANDARD.encode(private_pem.as_bytes()),
        BASE64_STANDARD.encode(public_pem.as_bytes()),
    )
}

/// Distinct access and refresh key pairs, generated once per test binary
pub fn test_keys() -> Arc<TokenKeys> {
    static KEYS: OnceLock<Arc<TokenKeys>> = OnceLock::new();
    KEYS.get_or_init(|| {
        let (access_private, access_public) = generate_base64_pem_pair();
        let (refresh_private, refresh_public) = generate_base64_pem_pair();
        Arc::new(TokenKeys {
            access: KeyPair::from_base64_pem("access", &access_private, &access_public)
                .expect("access key pair decodes"),
            refresh: KeyPair::from_base64_pem("refresh", &refresh_private, &refresh_public)
                .expect("refresh key pair decodes"),
        })
    })
    .clone()
}

pub fn test_policy() -> TokenPolicy {
    TokenPolicy {
        access_max_age: 15,
        refresh_max_age: 60,
        cookie_domain: "localhost".to_string(),
        cookie_secure: false,
    }
}
