//! Crowdin credential handling.
//!
//! Crowdin passes a JWT to app endpoints, either as a bearer token or as the
//! `jwtToken` query parameter. Tokens are HS256-signed with the app's client
//! secret.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("JWT token required")]
    Missing,

    #[error("Malformed JWT: {0}")]
    Malformed(String),

    #[error("Unsupported JWT algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid JWT signature")]
    InvalidSignature,

    #[error("JWT expired")]
    Expired,

    #[error("Invalid signing key")]
    InvalidKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtContext {
    pub organization_id: u64,
    pub project_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    #[serde(default)]
    pub domain: Option<String>,
    pub context: JwtContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JwtHeader {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Bearer header first, then the `jwtToken` query parameter.
pub fn extract_credential(
    authorization: Option<&str>,
    query_token: Option<&str>,
) -> Result<String, AuthError> {
    let from_header = authorization
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    from_header
        .or_else(|| query_token.map(str::trim).filter(|t| !t.is_empty()))
        .map(str::to_string)
        .ok_or(AuthError::Missing)
}

fn sign(signing_input: &str, secret: &str) -> Result<String, AuthError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| AuthError::InvalidKey)?;
    mac.update(signing_input.as_bytes());
    Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str, what: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| AuthError::Malformed(format!("{} is not base64url: {}", what, e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::Malformed(format!("{} is not valid JSON: {}", what, e)))
}

/// Decode a Crowdin JWT.
///
/// With a secret, the HS256 signature and expiry are enforced. Without one the
/// claims are decoded unverified.
pub fn decode_jwt(token: &str, secret: Option<&str>) -> Result<JwtClaims, AuthError> {
    let mut parts = token.split('.');
    let (header, payload, signature) = match (parts.next(), parts.next(), parts.next(), parts.next())
    {
        (Some(h), Some(p), Some(s), None) => (h, p, s),
        _ => return Err(AuthError::Malformed("expected three segments".to_string())),
    };

    let header: JwtHeader = decode_segment(header, "header")?;
    let claims: JwtClaims = decode_segment(payload, "payload")?;

    if let Some(secret) = secret {
        if header.alg != "HS256" {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }
        let signing_input = &token[..token.len() - signature.len() - 1];
        let expected = sign(signing_input, secret)?;
        if !constant_time_compare(&expected, signature.trim_end_matches('=')) {
            return Err(AuthError::InvalidSignature);
        }
        if let Some(exp) = claims.exp {
            if exp <= Utc::now().timestamp() {
                return Err(AuthError::Expired);
            }
        }
    }

    Ok(claims)
}

/// Encode claims as an HS256 JWT.
pub fn encode_jwt(claims: &JwtClaims, secret: &str) -> Result<String, AuthError> {
    let header = JwtHeader {
        alg: "HS256".to_string(),
        typ: Some("JWT".to_string()),
    };
    let header = serde_json::to_vec(&header).map_err(|e| AuthError::Malformed(e.to_string()))?;
    let payload = serde_json::to_vec(claims).map_err(|e| AuthError::Malformed(e.to_string()))?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header),
        URL_SAFE_NO_PAD.encode(payload)
    );
    let signature = sign(&signing_input, secret)?;
    Ok(format!("{}.{}", signing_input, signature))
}
