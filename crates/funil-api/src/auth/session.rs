//! Verification of identity-provider session tokens (HS256)

use crate::auth::models::{JwtClaims, UNAUTHENTICATED};
use funil_core::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

/// Allowed clock skew between the identity provider and this service
const LEEWAY_SECS: u64 = 30;

#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = LEEWAY_SECS;
        // Provider tokens carry an audience we do not pin.
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<JwtClaims, AppError> {
        decode::<JwtClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                AppError::Unauthorized(UNAUTHENTICATED.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    const SECRET: &str = "test-jwt-secret-with-at-least-32-chars!!";

    fn token(secret: &str, exp_offset: i64) -> String {
        let claims = JwtClaims {
            sub: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            exp: chrono::Utc::now().timestamp() + exp_offset,
            iat: None,
            name: Some("Ana".to_string()),
            user_metadata: None,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_is_accepted() {
        let claims = SessionVerifier::new(SECRET).verify(&token(SECRET, 3600)).unwrap();
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.full_name(), Some("Ana"));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let other = "another-secret-that-is-also-32-chars-long";
        let err = SessionVerifier::new(SECRET)
            .verify(&token(other, 3600))
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == UNAUTHENTICATED));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        assert!(SessionVerifier::new(SECRET)
            .verify(&token(SECRET, -3600))
            .is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(SessionVerifier::new(SECRET).verify("not-a-jwt").is_err());
    }
}
