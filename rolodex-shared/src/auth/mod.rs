/// Authentication utilities
///
/// Secure authentication primitives for Rolodex. The hashing and signing
/// algorithms themselves are treated as opaque, trusted functions; this
/// module only wires them to the application's types.
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Bearer token issue and verification (HS256, 24 h expiry)
/// - [`middleware`]: Axum middleware that gates protected routes
///
/// # Example
///
/// ```no_run
/// use rolodex_shared::auth::password::{hash_password, verify_password};
/// use rolodex_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(1, "user@example.com".to_string());
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!")?;
/// let verified = validate_token(&token, "secret-key-at-least-32-bytes-long!")?;
/// assert_eq!(verified.sub, 1);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
