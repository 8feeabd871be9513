/// Bearer-token authentication middleware for Axum
///
/// Protected routes are gated by this middleware: it extracts the
/// `Authorization: Bearer <token>` header, validates the token, and injects
/// an [`AuthContext`] into the request extensions. Rejection happens before
/// any handler (and therefore any store access) runs.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::post, Extension, Router};
/// use rolodex_shared::auth::middleware::{create_jwt_middleware, AuthContext};
///
/// async fn protected_handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.email)
/// }
///
/// let app: Router = Router::new()
///     .route("/contacts", post(protected_handler))
///     .route_layer(middleware::from_fn(create_jwt_middleware(
///         "secret-key-at-least-32-bytes-long!!",
///     )));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_token, JwtError};

/// Authentication context added to request extensions
///
/// Present on every request that passed the bearer check. Handlers extract
/// it with Axum's `Extension` extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user id
    pub user_id: i32,

    /// Authenticated user email
    pub email: String,
}

impl AuthContext {
    /// Builds the context from validated claims
    pub fn from_claims(claims: super::jwt::Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

/// Error type for the authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Authorization header is not a Bearer token
    InvalidFormat(String),

    /// Token validation failed (bad signature, expired, wrong issuer)
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials".to_string())
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Bearer-token authentication middleware
///
/// # Errors
///
/// - 401 when the Authorization header is missing, or the token is invalid
///   or expired
/// - 400 when the header is present but not in `Bearer <token>` form
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid token issuer".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    req.extensions_mut().insert(AuthContext::from_claims(claims));

    Ok(next.run(req).await)
}

/// Creates a bearer-token middleware closure for `axum::middleware::from_fn`
///
/// Captures the signing secret so route tables don't need access to the
/// application state.
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}
