use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::claims::Claims;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Why a credential was not accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("token verification failed: {0}")]
    InternalVerificationFailure(String),
}

/// Verify a HS256 access token and return its claims.
///
/// Errors:
/// - Expired token → `VerificationError::TokenExpired`
/// - Bad signature, malformed token, wrong algorithm or claim shape →
///   `VerificationError::TokenInvalid`
/// - Missing secret or unusable key material →
///   `VerificationError::InternalVerificationFailure`
pub fn verify_access_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<Claims, VerificationError> {
    if security.jwt_secret.is_empty() {
        return Err(VerificationError::InternalVerificationFailure(
            "signing secret is not configured".to_string(),
        ));
    }

    // Default Validation already checks exp; pin algorithm to configured algorithm.
    let mut validation = Validation::new(security.algorithm);
    validation.validate_aud = false;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => VerificationError::TokenExpired,
        ErrorKind::InvalidKeyFormat | ErrorKind::MissingAlgorithm => {
            VerificationError::InternalVerificationFailure(e.to_string())
        }
        _ => VerificationError::TokenInvalid,
    })
}

/// Mint a HS256 access token in the format the auth service issues.
pub fn mint_access_token(
    id: &str,
    email: Option<&str>,
    role: Option<&str>,
    now: SystemTime,
    ttl: Duration,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::unexpected("Failed to get current time"))?
        .as_secs() as i64;

    let claims = Claims {
        id: id.to_string(),
        email: email.map(str::to_string),
        role: role.map(str::to_string),
        iat: Some(iat),
        exp: iat + ttl.as_secs() as i64,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::unexpected(format!("Failed to encode JWT: {e}")))
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde_json::json;

    use super::{mint_access_token, verify_access_token, VerificationError};
    use crate::state::security_config::SecurityConfig;

    const SECRET: &str = "test_secret_key_for_testing_purposes_only";
    const TTL: Duration = Duration::from_secs(15 * 60);

    fn security() -> SecurityConfig {
        SecurityConfig::new(SECRET.as_bytes()).unwrap()
    }

    fn epoch_secs(t: SystemTime) -> i64 {
        t.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
    }

    #[test]
    fn test_mint_and_verify_roundtrip() {
        let security = security();
        let now = SystemTime::now();

        let token = mint_access_token(
            "42",
            Some("test@example.com"),
            Some("user"),
            now,
            TTL,
            &security,
        )
        .unwrap();
        let claims = verify_access_token(&token, &security).unwrap();

        assert_eq!(claims.id, "42");
        assert_eq!(claims.email.as_deref(), Some("test@example.com"));
        assert_eq!(claims.role.as_deref(), Some("user"));
        assert_eq!(claims.iat, Some(epoch_secs(now)));
        assert_eq!(claims.exp, epoch_secs(now) + 15 * 60);
    }

    #[test]
    fn test_expired_token() {
        let security = security();
        // An hour ago, well past the default leeway
        let issued = SystemTime::now() - Duration::from_secs(60 * 60);

        let token = mint_access_token("7", None, None, issued, TTL, &security).unwrap();

        assert_eq!(
            verify_access_token(&token, &security),
            Err(VerificationError::TokenExpired)
        );
    }

    #[test]
    fn test_bad_signature() {
        let security_a = SecurityConfig::new("secret-A".as_bytes()).unwrap();
        let security_b = SecurityConfig::new("secret-B".as_bytes()).unwrap();

        let token =
            mint_access_token("7", None, None, SystemTime::now(), TTL, &security_a).unwrap();

        assert_eq!(
            verify_access_token(&token, &security_b),
            Err(VerificationError::TokenInvalid)
        );
    }

    #[test]
    fn test_malformed_tokens() {
        let security = security();
        for token in ["", "not_even_close_to_jwt", "invalid.jwt.token", "a.b"] {
            assert_eq!(
                verify_access_token(token, &security),
                Err(VerificationError::TokenInvalid),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_other_algorithm_is_rejected() {
        let security = security();
        let exp = epoch_secs(SystemTime::now()) + 600;
        let token = encode(
            &Header::new(Algorithm::HS512),
            &json!({"id": "1", "exp": exp}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(
            verify_access_token(&token, &security),
            Err(VerificationError::TokenInvalid)
        );
    }

    #[test]
    fn test_numeric_id_claim() {
        let security = security();
        let exp = epoch_secs(SystemTime::now()) + 600;
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({"id": 42, "email": "n@example.com", "role": "admin", "exp": exp}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let claims = verify_access_token(&token, &security).unwrap();
        assert_eq!(claims.id, "42");
        assert_eq!(claims.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_token_without_exp_is_invalid() {
        let security = security();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({"id": "1"}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(
            verify_access_token(&token, &security),
            Err(VerificationError::TokenInvalid)
        );
    }

    #[test]
    fn test_empty_secret_is_internal_failure() {
        let mut security = security();
        let token =
            mint_access_token("1", None, None, SystemTime::now(), TTL, &security).unwrap();
        security.jwt_secret.clear();

        assert!(matches!(
            verify_access_token(&token, &security),
            Err(VerificationError::InternalVerificationFailure(_))
        ));
    }
}
