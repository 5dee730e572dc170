//! Access token models
//!
//! The JWT payload is decoded without verifying the signature. The token was
//! issued to this user by the platform over TLS and every API call
//! re-validates it server side; claims read here only drive display and the
//! advisory ownership check, never authorization.

use crate::error::{CliError, CliResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Audience the platform puts into CLI tokens
pub const EXPECTED_AUDIENCE: &str = "genecloud";

/// Decoded, unverified JWT claims
#[derive(Debug, Clone, PartialEq)]
pub struct JwtClaims {
    claims: Map<String, Value>,
}

impl JwtClaims {
    /// Decode the payload segment of a `header.payload.signature` token
    pub fn decode(token: &str) -> CliResult<Self> {
        let parts: Vec<&str> = token.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(CliError::MalformedToken(format!(
                "expected 3 segments, found {}",
                parts.len()
            )));
        }

        let payload = URL_SAFE_NO_PAD
            .decode(parts[1].trim_end_matches('='))
            .map_err(|e| CliError::MalformedToken(format!("invalid payload encoding: {e}")))?;

        let value: Value = serde_json::from_slice(&payload)
            .map_err(|e| CliError::MalformedToken(format!("invalid payload JSON: {e}")))?;

        match value {
            Value::Object(claims) => Ok(Self { claims }),
            _ => Err(CliError::MalformedToken(
                "payload is not a JSON object".to_string(),
            )),
        }
    }

    /// Raw claim by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// `sub` claim: the user the token was issued to
    pub fn subject(&self) -> Option<&str> {
        self.claims.get("sub").and_then(Value::as_str)
    }

    /// `aud` claim, which may be a string or an array of strings
    pub fn audiences(&self) -> Vec<&str> {
        match self.claims.get("aud") {
            Some(Value::String(aud)) => vec![aud.as_str()],
            Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Whether `aud` contains `expected`
    pub fn has_audience(&self, expected: &str) -> bool {
        self.audiences().contains(&expected)
    }

    /// `exp` claim as a timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims
            .get("exp")
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Log a warning when the token was minted for another audience
    ///
    /// Informational only; the server decides whether the token is accepted.
    pub fn warn_on_unexpected_audience(&self) {
        if !self.has_audience(EXPECTED_AUDIENCE) {
            tracing::warn!(
                expected = EXPECTED_AUDIENCE,
                found = ?self.audiences(),
                "Access token audience does not match"
            );
        }
    }
}

/// Response from `POST /api/tokens`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_with(payload: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap());
        format!("{header}.{body}.c2lnbmF0dXJl")
    }

    #[test]
    fn test_decode_subject() {
        let claims = JwtClaims::decode(&token_with(&json!({"sub": "alice"}))).unwrap();
        assert_eq!(claims.subject(), Some("alice"));
    }

    #[test]
    fn test_decode_wrong_segment_count() {
        for token in ["", "abc", "a.b", "a.b.c.d", "a.b.c.d.e"] {
            assert!(
                matches!(JwtClaims::decode(token), Err(CliError::MalformedToken(_))),
                "token {token:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_decode_invalid_json() {
        let body = URL_SAFE_NO_PAD.encode(b"not json");
        let err = JwtClaims::decode(&format!("h.{body}.s")).unwrap_err();
        assert!(matches!(err, CliError::MalformedToken(_)));
    }

    #[test]
    fn test_decode_non_object_payload() {
        let err = JwtClaims::decode(&token_with(&json!(["sub", "alice"]))).unwrap_err();
        assert!(matches!(err, CliError::MalformedToken(_)));
    }

    #[test]
    fn test_decode_tolerates_padding() {
        // 13 bytes, so the padded encoding ends in "=="
        let body = base64::engine::general_purpose::URL_SAFE.encode(br#"{"sub":"bob"}"#);
        assert!(body.ends_with("=="));
        let claims = JwtClaims::decode(&format!("h.{body}.s")).unwrap();
        assert_eq!(claims.subject(), Some("bob"));
    }

    #[test]
    fn test_audience_string_and_array() {
        let single = JwtClaims::decode(&token_with(&json!({"aud": "genecloud"}))).unwrap();
        assert!(single.has_audience(EXPECTED_AUDIENCE));

        let many =
            JwtClaims::decode(&token_with(&json!({"aud": ["other", "genecloud"]}))).unwrap();
        assert_eq!(many.audiences(), vec!["other", "genecloud"]);
        assert!(many.has_audience(EXPECTED_AUDIENCE));

        let none = JwtClaims::decode(&token_with(&json!({"sub": "x"}))).unwrap();
        assert!(!none.has_audience(EXPECTED_AUDIENCE));
    }

    #[test]
    fn test_expires_at() {
        let claims = JwtClaims::decode(&token_with(&json!({"exp": 1_700_000_000}))).unwrap();
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_700_000_000);
    }
}
