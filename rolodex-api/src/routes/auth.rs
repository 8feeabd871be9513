/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register a new account
/// - `POST /api/auth/login` - Login and get a bearer token
///
/// Both respond with the same shape: a 24-hour bearer token plus the
/// `{id, email}` user object the frontend caches.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use rolodex_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register/login request body
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    /// Email address
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// The user object returned to (and cached by) the frontend
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User id
    pub id: i32,

    /// Email address
    pub email: String,
}

/// Register/login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Bearer token (24 h expiry)
    pub token: String,

    /// The authenticated user
    pub user: UserResponse,
}

/// Register a new account
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// { "email": "a@b.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or email already in use
/// - `500 Internal Server Error`: server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    // Pre-write existence check; the users unique constraint backstops the
    // window between this check and the insert.
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already in use".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
        },
    )
    .await?;

    let claims = jwt::Claims::new(user.id, user.email.clone());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse {
                id: user.id,
                email: user.email,
            },
        }),
    ))
}

/// Login with email and password
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "a@b.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `401 Unauthorized`: unknown email or wrong password (indistinguishable
///   on purpose)
/// - `500 Internal Server Error`: server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let claims = jwt::Claims::new(user.id, user.email.clone());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id,
            email: user.email,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation_rules() {
        let valid = CredentialsRequest {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = CredentialsRequest {
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
        };
        let errors = bad_email.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));

        let short_password = CredentialsRequest {
            email: "a@b.com".to_string(),
            password: "five5".to_string(),
        };
        let errors = short_password.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
