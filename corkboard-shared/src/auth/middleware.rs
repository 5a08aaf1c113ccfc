/// Request identity resolution for Axum
///
/// Extracts the provider session token from the `Authorization: Bearer`
/// header, verifies it, and resolves the acting user's row. The resulting
/// [`Identity`] is inserted into request extensions by the API server's
/// identity layer; handlers extract it with Axum's `Extension` extractor.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use corkboard_shared::auth::middleware::Identity;
///
/// async fn handler(Extension(identity): Extension<Identity>) -> String {
///     format!("Acting user: {}", identity.user_id())
/// }
/// ```

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use sqlx::PgPool;

use super::identity::{verify_session_token, IdentityError};
use crate::models::user::User;

/// The resolved acting user, added to request extensions
#[derive(Debug, Clone)]
pub struct Identity {
    /// The acting user's row
    pub user: User,
}

impl Identity {
    /// The identity provider's stable id of the acting user
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

/// Error type for identity resolution
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token verification failed
    InvalidToken(String),

    /// The token verified but no user row exists for its subject (the
    /// lifecycle webhook has not created the user yet, or deleted it)
    UnknownUser(String),

    /// Database error
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::UnknownUser(_) => {
                (StatusCode::UNAUTHORIZED, "Unknown user").into_response()
            }
            AuthError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Resolves the acting user from request headers
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `secret` - The identity provider's token secret
/// * `headers` - The request's headers
///
/// # Errors
///
/// Returns an error if the Authorization header is missing or malformed,
/// the token fails verification, or no user row exists for the token's
/// subject
pub async fn resolve_identity(
    pool: &PgPool,
    secret: &str,
    headers: &HeaderMap,
) -> Result<Identity, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = verify_session_token(token, secret).map_err(|e| match e {
        IdentityError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        IdentityError::Invalid(msg) => AuthError::InvalidToken(msg),
    })?;

    let user = User::find_by_id(pool, &claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AuthError::UnknownUser(claims.sub.clone()))?;

    Ok(Identity { user })
}
