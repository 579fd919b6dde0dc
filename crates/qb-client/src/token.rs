//! Access tokens and the claims carried inside them.
//!
//! The server issues a JWT on login. The client reads the payload to learn
//! who is logged in; the signature is the server's business and is not
//! checked here.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use qb_core::UserId;

use crate::error::{ClientError, ClientResult};

/// Identity claims carried in the access token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Login email.
    pub email: String,
    /// Account identifier.
    pub id: UserId,
    /// Account role.
    #[serde(default)]
    pub role: String,
}

/// A raw access token with its decoded claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    /// The token as issued.
    pub token: String,
    /// Decoded payload.
    pub claims: TokenClaims,
}

impl AuthToken {
    /// Decode a token issued by the server.
    pub fn parse(token: impl Into<String>) -> ClientResult<Self> {
        let token = token.into();
        let claims = decode_claims(&token)?;
        Ok(Self { token, claims })
    }
}

/// Decode the payload segment of a JWT.
pub fn decode_claims(token: &str) -> ClientResult<TokenClaims> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(ClientError::InvalidToken(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ClientError::InvalidToken(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidToken(e.to_string()))
}

#[cfg(test)]
pub(crate) fn encode_test_token(email: &str, id: u64, role: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({ "email": email, "id": id, "role": role, "iat": 1714560000 })
            .to_string(),
    );
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_payload() {
        let token = encode_test_token("ana@example.com", 12, "player");
        let auth = AuthToken::parse(token.clone()).unwrap();
        assert_eq!(auth.token, token);
        assert_eq!(auth.claims.email, "ana@example.com");
        assert_eq!(auth.claims.id, UserId(12));
        assert_eq!(auth.claims.role, "player");
    }

    #[test]
    fn tolerates_padding() {
        let token = encode_test_token("a@b.c", 1, "admin");
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1].push_str("==");
        assert!(decode_claims(&parts.join(".")).is_ok());
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(matches!(
            decode_claims("not-a-token"),
            Err(ClientError::InvalidToken(_))
        ));
        assert!(matches!(
            decode_claims("a.b.c.d"),
            Err(ClientError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_garbage_payload() {
        assert!(matches!(
            decode_claims("aaa.!!!.ccc"),
            Err(ClientError::InvalidToken(_))
        ));
        let payload = URL_SAFE_NO_PAD.encode(b"{\"nope\":true}");
        assert!(matches!(
            decode_claims(&format!("aaa.{payload}.ccc")),
            Err(ClientError::InvalidToken(_))
        ));
    }
}
