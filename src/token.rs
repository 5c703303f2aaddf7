// src/token.rs
use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::error::ApiError;
use crate::models::auth::Claims;

/// Decode the payload of a bearer token without verifying its signature.
///
/// The client never holds the backend's signing secret, so this is a
/// structural decode only: the server re-validates the signature on every
/// call. Expiry is deliberately not validated here: the interceptor
/// performs its own point-in-time comparison so it can distinguish an
/// expired token from an undecodable one.
pub fn decode_claims(token: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| {
            tracing::warn!("Token decode failed: {}", e);
            ApiError::TokenInvalid
        })?;

    Ok(data.claims)
}

/// Point-in-time expiry check against the given epoch second.
pub fn is_expired_at(claims: &Claims, now: i64) -> bool {
    claims.exp <= now
}

pub fn is_expired(claims: &Claims) -> bool {
    is_expired_at(claims, Utc::now().timestamp())
}
