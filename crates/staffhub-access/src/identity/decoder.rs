//! Access token decoding and validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use staffhub_core::config::identity::IdentityConfig;
use staffhub_core::error::AppError;
use staffhub_core::result::AppResult;

use super::claims::Claims;

/// Validates HS256 access tokens issued by the external identity provider.
pub struct TokenDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecoder").finish()
    }
}

impl TokenDecoder {
    /// Creates a decoder from the shared secret and optional issuer.
    pub fn new(config: &IdentityConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if !config.issuer.is_empty() {
            validation.set_issuer(&[&config.issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token, returning its claims.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::authentication(format!("Invalid access token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use uuid::Uuid;

    use staffhub_entity::user::StaffRole;

    fn config() -> IdentityConfig {
        IdentityConfig {
            token_secret: "test-secret".to_string(),
            issuer: String::new(),
        }
    }

    fn token_for(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_roundtrip() {
        let decoder = TokenDecoder::new(&config());
        let user_id = Uuid::new_v4();
        let claims = Claims {
            sub: user_id,
            role: StaffRole::Manager,
            iss: None,
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        };

        let decoded = decoder.decode(&token_for(&claims, "test-secret")).unwrap();
        assert_eq!(decoded.user_id(), user_id);
        assert_eq!(decoded.role, StaffRole::Manager);
    }

    #[test]
    fn test_rejects_wrong_secret_and_expired() {
        let decoder = TokenDecoder::new(&config());
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: StaffRole::Staff,
            iss: None,
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() + 3600,
        };
        assert!(decoder.decode(&token_for(&claims, "other-secret")).is_err());

        let expired = Claims {
            exp: Utc::now().timestamp() - 3600,
            ..claims
        };
        assert!(decoder.decode(&token_for(&expired, "test-secret")).is_err());
    }
}
