//! Signed session tokens.
//!
//! The session cookie carries a compact signed token holding the user id and
//! username. Logout is simply cookie removal; the token also expires on its
//! own after the configured TTL.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ripple_core::domain::SessionIdentity;
use ripple_core::ports::{AuthError, TokenService};

/// Session token configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_hours: i64,
    pub issuer: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            ttl_hours: 24,
            issuer: "ripple".to_string(),
        }
    }
}

/// Serialized claim set inside the session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    name: String, // username
    exp: i64,
    iat: i64,
    iss: String,
}

/// Session token service backed by an HMAC-signed token.
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: SessionConfig,
}

impl SessionTokenService {
    pub fn new(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    pub fn from_env() -> Self {
        let secret =
            std::env::var("SECRET_KEY").unwrap_or_else(|_| "change-me-in-production".to_string());

        if secret == "change-me-in-production" {
            tracing::warn!("Using default session secret. Set SECRET_KEY for production use.");
        }

        let config = SessionConfig {
            secret,
            ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24),
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "ripple".to_string()),
        };
        Self::new(config)
    }
}

impl TokenService for SessionTokenService {
    fn issue(&self, identity: &SessionIdentity) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::hours(self.config.ttl_hours);

        let claims = Claims {
            sub: identity.user_id.to_string(),
            name: identity.username.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate(&self, token: &str) -> Result<SessionIdentity, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(SessionIdentity::new(user_id, data.claims.name))
    }

    fn ttl_seconds(&self) -> i64 {
        self.config.ttl_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SessionConfig {
        SessionConfig {
            secret: "test-secret-key".to_string(),
            ttl_hours: 1,
            issuer: "test-issuer".to_string(),
        }
    }

    fn alice() -> SessionIdentity {
        SessionIdentity::new(Uuid::new_v4(), "alice")
    }

    #[test]
    fn issue_then_validate_round_trips_the_identity() {
        let service = SessionTokenService::new(test_config());
        let identity = alice();

        let token = service.issue(&identity).unwrap();
        let recovered = service.validate(&token).unwrap();

        assert_eq!(recovered.user_id, identity.user_id);
        assert_eq!(recovered.username, "alice");
    }

    #[test]
    fn garbage_token_is_rejected() {
        let service = SessionTokenService::new(test_config());

        let result = service.validate("not-a-token");

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative TTL puts the expiry beyond the default validation leeway.
        let service = SessionTokenService::new(SessionConfig {
            ttl_hours: -2,
            ..test_config()
        });

        let token = service.issue(&alice()).unwrap();

        assert!(matches!(
            service.validate(&token),
            Err(AuthError::SessionExpired)
        ));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let issuing = SessionTokenService::new(SessionConfig {
            secret: "one-secret".to_string(),
            ..test_config()
        });
        let validating = SessionTokenService::new(SessionConfig {
            secret: "another-secret".to_string(),
            ..test_config()
        });

        let token = issuing.issue(&alice()).unwrap();

        assert!(validating.validate(&token).is_err());
    }

    #[test]
    fn ttl_is_reported_in_seconds() {
        let service = SessionTokenService::new(test_config());

        assert_eq!(service.ttl_seconds(), 3600);
    }
}
