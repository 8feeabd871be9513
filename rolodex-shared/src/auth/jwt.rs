/// Bearer token issue and verification
///
/// Tokens are self-contained HS256 JWTs carrying the user's id and email.
/// Nothing is persisted server-side, which means a token cannot be revoked
/// before its natural expiry; the expiry is therefore kept short (24 hours).
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC-SHA256)
/// - **Expiration**: fixed 24 hours
/// - **Validation**: signature, expiration, and issuer checks
/// - **Secret**: must be at least 32 bytes; startup enforces this
///
/// # Example
///
/// ```
/// use rolodex_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(7, "user@example.com".to_string());
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, 7);
/// assert_eq!(validated.email, "user@example.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token issuer claim value
const ISSUER: &str = "rolodex";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid token issuer")]
    InvalidIssuer,
}

/// JWT claims structure
///
/// # Claims
///
/// - `sub`: user id
/// - `email`: user email (custom claim)
/// - `iss`: always "rolodex"
/// - `iat`: issued at (Unix timestamp)
/// - `exp`: expiration (Unix timestamp)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: i32,

    /// User email (custom claim)
    pub email: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user with the fixed 24-hour expiry
    pub fn new(user_id: i32, email: String) -> Self {
        Self::with_expiration(user_id, email, Duration::hours(24))
    }

    /// Creates claims with a custom expiration (used by tests to build
    /// already-expired tokens)
    pub fn with_expiration(user_id: i32, email: String, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            email,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Checks whether the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed JWT token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts its claims
///
/// Verifies the signature, the expiration, and that the issuer is
/// "rolodex". Any failure rejects the token; on a protected route that
/// rejection halts the pipeline before any store access.
///
/// # Errors
///
/// - `JwtError::Expired` when `exp` has passed
/// - `JwtError::InvalidIssuer` on an issuer mismatch
/// - `JwtError::ValidationError` for every other defect (bad signature,
///   malformed token, wrong algorithm)
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(3, "a@b.com".to_string());

        assert_eq!(claims.sub, 3);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.iss, "rolodex");
        assert!(!claims.is_expired());
        // 24 hour window, allowing a second of slack for the test itself
        assert!(claims.exp - claims.iat >= 24 * 3600 - 1);
        assert!(claims.exp - claims.iat <= 24 * 3600 + 1);
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new(42, "user@example.com".to_string());
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, 42);
        assert_eq!(validated.email, "user@example.com");
        assert_eq!(validated.iss, "rolodex");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(1, "a@b.com".to_string());
        let token = create_token(&claims, SECRET).expect("Should create token");

        let result = validate_token(&token, "a-different-secret-of-32-characters!");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_expiration(
            1,
            "a@b.com".to_string(),
            Duration::seconds(-3600), // expired an hour ago
        );

        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_garbage_token() {
        let result = validate_token("not.a.token", SECRET);
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_validate_wrong_issuer() {
        let mut claims = Claims::new(1, "a@b.com".to_string());
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).expect("Should create token");

        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::InvalidIssuer)));
    }
}
