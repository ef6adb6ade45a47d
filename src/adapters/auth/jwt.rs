//! HS256 JWT access token validation.
//!
//! Tokens are issued by the marketplace's identity service and signed with a
//! shared secret. The subject claim is the user id the booking core knows.

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::AccessTokenValidator;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject - the user id.
    pub sub: String,
    pub iss: String,
    pub aud: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Validates HS256 access tokens against a shared secret.
pub struct JwtAccessTokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAccessTokenValidator {
    pub fn new(secret: &SecretString, issuer: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl AccessTokenValidator for JwtAccessTokenValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<AccessClaims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    tracing::debug!(error = %e, "Rejected access token");
                    AuthError::InvalidToken
                }
            }
        })?;

        let claims = data.claims;
        let id = UserId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(id, claims.email, claims.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-that-is-long-enough";

    fn validator() -> JwtAccessTokenValidator {
        JwtAccessTokenValidator::new(
            &SecretString::new(SECRET.to_string()),
            "skill-exchange-identity",
            "skill-exchange-api",
        )
    }

    fn claims(exp_offset_secs: i64) -> AccessClaims {
        AccessClaims {
            sub: "learner-1".to_string(),
            iss: "skill-exchange-identity".to_string(),
            aud: "skill-exchange-api".to_string(),
            exp: Utc::now().timestamp() + exp_offset_secs,
            email: Some("lee@example.com".to_string()),
            name: Some("Lee".to_string()),
        }
    }

    fn sign(claims: &AccessClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn valid_token_yields_user() {
        let token = sign(&claims(3600), SECRET);
        let user = validator().validate(&token).await.unwrap();

        assert_eq!(user.id.as_str(), "learner-1");
        assert_eq!(user.email.as_deref(), Some("lee@example.com"));
        assert_eq!(user.label(), "Lee");
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let token = sign(&claims(-3600), SECRET);
        assert_eq!(validator().validate(&token).await, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let token = sign(&claims(3600), "another-secret-entirely");
        assert_eq!(validator().validate(&token).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn wrong_audience_is_invalid() {
        let mut c = claims(3600);
        c.aud = "someone-else".to_string();
        let token = sign(&c, SECRET);
        assert_eq!(validator().validate(&token).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        assert_eq!(
            validator().validate("not-a-jwt").await,
            Err(AuthError::InvalidToken)
        );
    }
}
