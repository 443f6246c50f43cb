use axum::http::StatusCode;
use thiserror::Error;

/// Rejection raised while authorizing a request against a bearer token.
///
/// Every variant carries a stable machine-readable code and the status the
/// HTTP layer reports it with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    HeaderMissing,

    #[error("Authorization header must start with \"Bearer\".")]
    NotBearer,

    #[error("Token not found.")]
    TokenMissing,

    #[error("Authorization header must be bearer token.")]
    TooManyParts,

    #[error("Authorization malformed.")]
    MissingKeyId,

    #[error("Token expired.")]
    TokenExpired,

    #[error("Incorrect claims. Please, check the audience and issuer.")]
    IncorrectClaims,

    #[error("Unable to parse authentication token.")]
    Unparseable,

    #[error("Unable to find the appropriate key.")]
    UnknownKey,

    #[error("Permissions not included in JWT.")]
    PermissionsMissing,

    #[error("Permission not found.")]
    PermissionDenied,

    #[error("Unable to fetch signing keys.")]
    KeysUnavailable,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "authorization_header_missing",
            AuthError::NotBearer
            | AuthError::TokenMissing
            | AuthError::TooManyParts
            | AuthError::MissingKeyId
            | AuthError::Unparseable
            | AuthError::UnknownKey => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::IncorrectClaims | AuthError::PermissionsMissing => "invalid_claims",
            AuthError::PermissionDenied => "unauthorized",
            AuthError::KeysUnavailable => "jwks_unavailable",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::HeaderMissing
            | AuthError::NotBearer
            | AuthError::TokenMissing
            | AuthError::TooManyParts
            | AuthError::MissingKeyId
            | AuthError::TokenExpired
            | AuthError::IncorrectClaims => StatusCode::UNAUTHORIZED,
            AuthError::Unparseable | AuthError::UnknownKey | AuthError::PermissionsMissing => {
                StatusCode::BAD_REQUEST
            }
            AuthError::PermissionDenied => StatusCode::FORBIDDEN,
            AuthError::KeysUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
