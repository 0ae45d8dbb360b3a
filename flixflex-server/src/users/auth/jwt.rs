use chrono::{Duration, Utc};
use flixflex_model::{Claims, User};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};

/// HS256 signing and verification keys derived from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Signature and expiry check. Does not consult the user store.
    pub fn validate(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user() -> User {
        User {
            id: Uuid::now_v7(),
            username: "neo".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_tokens_validate() {
        let keys = JwtKeys::new("secret", 12);
        let user = user();

        let claims = keys.validate(&keys.issue(&user).unwrap()).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "neo");
        assert_eq!(claims.exp - claims.iat, 12 * 3600);
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let token = JwtKeys::new("one", 12).issue(&user()).unwrap();
        assert!(JwtKeys::new("two", 12).validate(&token).is_err());
    }

    #[test]
    fn rejects_expired_tokens() {
        let keys = JwtKeys::new("secret", -2);
        let token = keys.issue(&user()).unwrap();
        assert!(keys.validate(&token).is_err());
    }
}
