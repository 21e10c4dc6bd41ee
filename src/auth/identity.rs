use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde::Serialize;

use super::TokenKeys;

/// Authenticated caller decoded from a bearer token
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

impl Identity {
    pub fn new(username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            username: username.into(),
            is_admin,
        }
    }
}

const BEARER_PREFIX: &str = "Bearer ";

/// Derives an optional identity from the `Authorization` header.
///
/// Never fails: a missing header, a different scheme, or a token that does
/// not verify all yield `None` so anonymous routes stay reachable.
#[derive(Clone)]
pub struct IdentityExtractor {
    keys: TokenKeys,
}

impl IdentityExtractor {
    pub fn new(keys: TokenKeys) -> Self {
        Self { keys }
    }

    pub fn extract(&self, header: Option<&str>) -> Option<Identity> {
        let token = header?.strip_prefix(BEARER_PREFIX)?.trim();
        if token.is_empty() {
            return None;
        }

        match self.keys.decode(token) {
            Ok(claims) => Some(Identity {
                username: claims.username,
                is_admin: claims.is_admin,
            }),
            Err(e) => {
                tracing::debug!("Ignoring unverifiable bearer token: {}", e);
                None
            }
        }
    }

    pub fn extract_from_headers(&self, headers: &HeaderMap) -> Option<Identity> {
        let header = headers.get(AUTHORIZATION)?.to_str().ok();
        self.extract(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "secret-test";

    fn extractor() -> IdentityExtractor {
        IdentityExtractor::new(TokenKeys::new(SECRET, 1))
    }

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn future_exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn test_valid_token_via_header() {
        let token = sign(json!({"username": "test", "isAdmin": false, "exp": future_exp()}), SECRET);
        let identity = extractor().extract(Some(&format!("Bearer {}", token)));
        assert_eq!(identity, Some(Identity::new("test", false)));
    }

    #[test]
    fn test_missing_is_admin_defaults_to_false() {
        let token = sign(json!({"username": "test", "exp": future_exp()}), SECRET);
        let identity = extractor().extract(Some(&format!("Bearer {}", token))).unwrap();
        assert!(!identity.is_admin);
    }

    #[test]
    fn test_no_header() {
        assert_eq!(extractor().extract(None), None);
        assert_eq!(extractor().extract_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn test_wrong_scheme() {
        let token = sign(json!({"username": "test", "isAdmin": true, "exp": future_exp()}), SECRET);
        assert_eq!(extractor().extract(Some(&format!("Basic {}", token))), None);
        assert_eq!(extractor().extract(Some(&token)), None);
        assert_eq!(extractor().extract(Some("Bearer ")), None);
    }

    #[test]
    fn test_bad_signature() {
        let token = sign(json!({"username": "test", "isAdmin": false, "exp": future_exp()}), "wrong");
        assert_eq!(extractor().extract(Some(&format!("Bearer {}", token))), None);
    }

    #[test]
    fn test_garbled_and_expired_tokens() {
        assert_eq!(extractor().extract(Some("Bearer not-a-token")), None);

        let expired = sign(json!({"username": "test", "isAdmin": true, "exp": 1_000}), SECRET);
        assert_eq!(extractor().extract(Some(&format!("Bearer {}", expired))), None);
    }

    #[test]
    fn test_token_without_exp_is_accepted() {
        let token = sign(json!({"username": "test", "isAdmin": false}), SECRET);
        let identity = extractor().extract(Some(&format!("Bearer {}", token)));
        assert_eq!(identity, Some(Identity::new("test", false)));
    }

    #[test]
    fn test_missing_username_is_absent() {
        let token = sign(json!({"isAdmin": true, "exp": future_exp()}), SECRET);
        assert_eq!(extractor().extract(Some(&format!("Bearer {}", token))), None);
    }

    #[test]
    fn test_extract_from_headers() {
        let token = TokenKeys::new(SECRET, 1).create_token(&Identity::new("admin", true)).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, format!("Bearer {}", token).parse().unwrap());
        assert_eq!(
            extractor().extract_from_headers(&headers),
            Some(Identity::new("admin", true))
        );
    }
}
