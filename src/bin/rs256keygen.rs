// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the tokengate project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # RS256 Key Generator
//!
//! Generates the RSA key pairs the token subsystem signs and verifies
//! with, in the exact form the configuration consumes: PKCS#1 PEM,
//! base64-encoded, one pair per token class.
//!
//! ## Usage
//!
//! ```text
//! rs256keygen [--length <BITS>] [--env-file <PATH>]
//! ```
//!
//! Without `--env-file` the four variables are printed to stdout, ready
//! to paste into a `.env` file:
//!
//! ```text
//! ACCESS_TOKEN_PRIVATE_KEY=...
//! ACCESS_TOKEN_PUBLIC_KEY=...
//! REFRESH_TOKEN_PRIVATE_KEY=...
//! REFRESH_TOKEN_PUBLIC_KEY=...
//! ```

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use clap::Parser;
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

/// Command line arguments for the key generation utility
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Generate base64-encoded RSA key pairs for JWT signing (one pair per token class)"
)]
struct Args {
    /// RSA key length in bits.
    ///
    /// Common values are 2048, 3072, or 4096 bits. Longer keys provide
    /// more security but slow signing and verification down.
    #[clap(long, default_value = "2048")]
    length: usize,

    /// Write the variables to this file instead of stdout
    #[clap(long)]
    env_file: Option<PathBuf>,
}

fn generate_base64_pair(length: usize) -> Result<(String, String)> {
    let mut rng = rsa::rand_core::OsRng;
    let private_key =
        RsaPrivateKey::new(&mut rng, length).context("Failed to generate RSA private key")?;
    let public_key = RsaPublicKey::from(&private_key);

    let private_pem = private_key
        .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
        .context("Failed to encode private key as PEM")?;
    let public_pem = public_key
        .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
        .context("Failed to encode public key as PEM")?;

    Ok((
        BASE64_STANDARD.encode(private_pem.as_bytes()),
        BASE64_STANDARD.encode(public_pem.as_bytes()),
    ))
}

fn main() -> Result<()> {
    let args = Args::parse();

    eprintln!("Generating two RSA key pairs with {} bits...", args.length);
    let (access_private, access_public) = generate_base64_pair(args.length)?;
    let (refresh_private, refresh_public) = generate_base64_pair(args.length)?;

    let output = format!(
        "ACCESS_TOKEN_PRIVATE_KEY={access_private}\n\
         ACCESS_TOKEN_PUBLIC_KEY={access_public}\n\
         REFRESH_TOKEN_PRIVATE_KEY={refresh_private}\n\
         REFRESH_TOKEN_PUBLIC_KEY={refresh_public}\n"
    );

    match args.env_file {
        Some(path) => {
            let mut file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            file.write_all(output.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Keys written to {}", path.display());
        }
        None => print!("{output}"),
    }

    Ok(())
}
