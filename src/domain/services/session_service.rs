use crate::domain::models::{auth::{Claims, Role}, user::User};
use crate::error::AppError;
use crate::config::Config;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{Duration, Utc};

/// Resolves bearer tokens into caller identities.
///
/// Login and sign-up live elsewhere; tokens are only minted here for tooling and tests.
pub struct SessionService {
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SessionService {
    pub fn new(config: &Config) -> Self {
        Self::from_secret(config.jwt_secret.as_bytes(), config.auth_issuer.clone())
    }

    pub fn from_secret(secret: &[u8], issuer: String) -> Self {
        Self {
            issuer,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    pub fn issue_token(&self, user_id: &str, role: Role) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            exp: (now + Duration::hours(12)).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            role,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })
    }

    pub fn verify(&self, token: &str) -> Result<User, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized)?;

        Ok(User { id: data.claims.sub, role: data.claims.role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify() {
        let svc = SessionService::from_secret(b"unit-test-secret", "issuer-a".into());
        let token = svc.issue_token("op-1", Role::Operator).unwrap();
        let user = svc.verify(&token).unwrap();
        assert_eq!(user.id, "op-1");
        assert!(user.is_operator());
    }

    #[test]
    fn foreign_issuer_or_secret_is_rejected() {
        let a = SessionService::from_secret(b"unit-test-secret", "issuer-a".into());
        let b = SessionService::from_secret(b"unit-test-secret", "issuer-b".into());
        let c = SessionService::from_secret(b"other-secret", "issuer-a".into());
        let token = a.issue_token("u", Role::Traveler).unwrap();

        assert!(matches!(b.verify(&token), Err(AppError::Unauthorized)));
        assert!(matches!(c.verify(&token), Err(AppError::Unauthorized)));
        assert!(matches!(a.verify("garbage"), Err(AppError::Unauthorized)));
    }
}
