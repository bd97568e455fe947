//! Service-account authentication for the Google Sheets API.
//!
//! A short-lived RS256 JWT signed with the service account's private key is
//! exchanged for a bearer token at Google's OAuth endpoint.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use ring::rand::SystemRandom;
use ring::signature::{RsaKeyPair, RSA_PKCS1_SHA256};
use serde::Serialize;
use std::fmt;

use super::SheetsError;
use crate::constants::{GOOGLE_TOKEN_URL, JWT_LIFETIME_SECS, SHEETS_SCOPE};

/// Normalize a private key as it arrives from the environment
///
/// Strips one layer of surrounding quotes, only when both ends carry the same
/// quote character, then turns every literal `\n` into a line break.
pub fn normalize_private_key(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = match (trimmed.chars().next(), trimmed.chars().last()) {
        (Some(first), Some(last))
            if trimmed.len() >= 2 && first == last && (first == '"' || first == '\'') =>
        {
            &trimmed[1..trimmed.len() - 1]
        }
        _ => trimmed,
    };
    unquoted.replace("\\n", "\n")
}

/// Decode the body of a PEM block into DER bytes
fn pem_to_der(pem: &str) -> Result<Vec<u8>, SheetsError> {
    if !pem.contains("-----BEGIN") {
        return Err(SheetsError::Credentials(
            "private key is not PEM encoded".to_string(),
        ));
    }

    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("-----"))
        .collect();

    STANDARD
        .decode(body)
        .map_err(|e| SheetsError::Credentials(format!("invalid base64 in private key: {}", e)))
}

#[derive(Serialize)]
struct JwtHeader<'a> {
    alg: &'a str,
    typ: &'a str,
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Service account identity with its parsed signing key
pub struct ServiceAccount {
    client_email: String,
    key: RsaKeyPair,
    rng: SystemRandom,
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl ServiceAccount {
    /// Parse a PKCS#8 PEM private key (already normalized)
    pub fn new(client_email: impl Into<String>, private_key_pem: &str) -> Result<Self, SheetsError> {
        let der = pem_to_der(private_key_pem)?;
        let key = RsaKeyPair::from_pkcs8(&der)
            .map_err(|e| SheetsError::Credentials(format!("rejected private key: {}", e)))?;

        Ok(Self {
            client_email: client_email.into(),
            key,
            rng: SystemRandom::new(),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Signed JWT assertion for the OAuth token exchange
    pub fn assertion(&self, issued_at: i64) -> Result<String, SheetsError> {
        let header = JwtHeader {
            alg: "RS256",
            typ: "JWT",
        };
        let claims = JwtClaims {
            iss: &self.client_email,
            scope: SHEETS_SCOPE,
            aud: GOOGLE_TOKEN_URL,
            iat: issued_at,
            exp: issued_at + JWT_LIFETIME_SECS,
        };

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
        );

        let mut signature = vec![0u8; self.key.public().modulus_len()];
        self.key
            .sign(
                &RSA_PKCS1_SHA256,
                &self.rng,
                signing_input.as_bytes(),
                &mut signature,
            )
            .map_err(|_| SheetsError::Credentials("failed to sign assertion".to_string()))?;

        Ok(format!(
            "{}.{}",
            signing_input,
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }
}
