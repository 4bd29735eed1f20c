use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token was issued for.
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates the bearer tokens used by the access guard.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl JwtManager {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn validate(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_jwt() -> JwtManager {
        JwtManager::new(b"test-secret-key", 3600)
    }

    #[test]
    fn issue_and_validate() {
        let jwt = test_jwt();
        let token = jwt.issue("user-1", Role::User).unwrap();
        let claims = jwt.validate(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn admin_role_round_trips() {
        let jwt = test_jwt();
        let token = jwt.issue("admin-1", Role::Admin).unwrap();
        let claims = jwt.validate(&token).unwrap();
        assert_eq!(Role::parse(&claims.role), Role::Admin);
    }

    #[test]
    fn garbage_token_fails() {
        let jwt = test_jwt();
        assert!(jwt.validate("not-a-token").is_err());
    }

    #[test]
    fn wrong_secret_fails() {
        let jwt1 = test_jwt();
        let jwt2 = JwtManager::new(b"other-secret", 3600);
        let token = jwt1.issue("user-1", Role::User).unwrap();
        assert!(jwt2.validate(&token).is_err());
    }

    #[test]
    fn expired_token_fails() {
        let jwt = JwtManager::new(b"test-secret-key", -120);
        let token = jwt.issue("user-1", Role::User).unwrap();
        assert!(jwt.validate(&token).is_err());
    }
}
