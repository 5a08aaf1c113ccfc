/// Identity provider session token verification
///
/// The external identity provider signs session tokens as HS256 JWTs with
/// a secret shared out of band. The token's `sub` claim is the provider's
/// stable user id; Corkboard never issues tokens of its own.
///
/// # Example
///
/// ```no_run
/// use corkboard_shared::auth::identity::verify_session_token;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = verify_session_token("eyJhb...", "shared-secret")?;
/// println!("Acting user: {}", claims.sub);
/// # Ok(())
/// # }
/// ```

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by a provider session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The identity provider's stable user id
    pub sub: String,

    /// Expiration (unix timestamp, seconds)
    pub exp: i64,

    /// Issued-at (unix timestamp, seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Error type for session token verification
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The token has expired
    #[error("session token expired")]
    Expired,

    /// The token is malformed or its signature does not verify
    #[error("invalid session token: {0}")]
    Invalid(String),
}

/// Verifies a provider session token and returns its claims
///
/// # Errors
///
/// Returns [`IdentityError::Expired`] for expired tokens and
/// [`IdentityError::Invalid`] for anything else (bad signature, malformed
/// token, wrong algorithm)
pub fn verify_session_token(token: &str, secret: &str) -> Result<SessionClaims, IdentityError> {
    let validation = Validation::new(Algorithm::HS256);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => IdentityError::Expired,
        _ => IdentityError::Invalid(e.to_string()),
    })?;

    Ok(data.claims)
}
