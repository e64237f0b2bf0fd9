use jsonwebtoken::Algorithm;

use crate::error::AppError;

/// Configuration for JWT security settings
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Secret shared with the auth service for verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm to use (defaults to HS256)
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret.
    ///
    /// An empty secret is a configuration fault: the gateway must refuse to
    /// start rather than verify tokens against it.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Result<Self, AppError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.is_empty() {
            return Err(AppError::config("JWT_SECRET must not be empty"));
        }

        Ok(Self {
            jwt_secret,
            algorithm: Algorithm::HS256,
        })
    }
}
