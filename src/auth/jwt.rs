//! JWT issuance and validation, adapted from the teacher's `JwtHandler`:
//! same `encode`/`decode` shape, claims trimmed to what the spec actually
//! needs (subject + expiry — no role claim, since this system has none).

use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub struct JwtHandler {
    secret: String,
    expiration: Duration,
}

impl JwtHandler {
    pub fn new(secret: String, expiration: Duration) -> Self {
        Self { secret, expiration }
    }

    pub fn generate_token(&self, user_id: Uuid) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(chrono::Duration::from_std(self.expiration).unwrap_or_default())
            .context("invalid expiration timestamp")?
            .timestamp() as usize;

        let claims = Claims { sub: user_id.to_string(), exp: expiration };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .context("failed to sign jwt")
    }

    pub fn validate_token(&self, token: &str) -> Result<Uuid> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .context("invalid or expired token")?;

        Uuid::parse_str(&decoded.claims.sub).context("malformed subject claim")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> JwtHandler {
        JwtHandler::new("test-secret-key-12345".to_string(), Duration::from_secs(3600))
    }

    #[test]
    fn round_trips_user_id() {
        let user_id = Uuid::new_v4();
        let token = handler().generate_token(user_id).unwrap();
        assert_eq!(handler().validate_token(&token).unwrap(), user_id);
    }

    #[test]
    fn rejects_token_signed_with_different_secret() {
        let token = handler().generate_token(Uuid::new_v4()).unwrap();
        let other = JwtHandler::new("a-different-secret".to_string(), Duration::from_secs(3600));
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn rejects_garbage_token() {
        assert!(handler().validate_token("not.a.jwt").is_err());
    }
}
