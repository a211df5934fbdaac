/*
 * Responsibility
 * - Error taxonomy for the authorization pipeline
 * - Each variant carries a machine-readable code + HTTP status; Display is the
 *   human description rendered to the client
 */
use axum::http::StatusCode;
use thiserror::Error;

/// Failure to retrieve or decode the provider's published key set.
#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("jwks request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("jwks endpoint returned status {0}")]
    Status(StatusCode),
}

/// Any failure along extract → verify → enforce.
///
/// These propagate unmodified to the response boundary; the wrapped handler
/// never runs once one is raised.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    HeaderMissing,

    #[error("Authorization header is not valid UTF-8.")]
    InvalidEncoding,

    #[error("Authorization header must start with \"Bearer\".")]
    InvalidScheme,

    #[error("Token not found.")]
    TokenNotFound,

    #[error("Authorization header must be bearer token.")]
    TooManyParts,

    #[error("Authorization malformed.")]
    MissingKid,

    #[error("Unable to find the appropriate key.")]
    NoMatchingKey,

    #[error("Token expired.")]
    TokenExpired,

    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,

    #[error("Unable to parse authentication token.")]
    Unparsable,

    #[error("Unable to fetch signing keys.")]
    KeySetFetch(#[source] KeySetError),

    #[error("Permissions not included in JWT.")]
    PermissionsMissing,

    #[error("Permission not found.")]
    PermissionDenied,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::HeaderMissing => "authorization_header_missing",
            Self::InvalidEncoding
            | Self::InvalidScheme
            | Self::TokenNotFound
            | Self::TooManyParts
            | Self::MissingKid
            | Self::NoMatchingKey
            | Self::Unparsable
            | Self::KeySetFetch(_) => "invalid_header",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims | Self::PermissionsMissing => "invalid_claims",
            Self::PermissionDenied => "unauthorized",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::HeaderMissing
            | Self::InvalidEncoding
            | Self::InvalidScheme
            | Self::TokenNotFound
            | Self::TooManyParts
            | Self::MissingKid
            | Self::TokenExpired
            | Self::InvalidClaims => StatusCode::UNAUTHORIZED,
            Self::NoMatchingKey
            | Self::Unparsable
            | Self::KeySetFetch(_)
            | Self::PermissionsMissing => StatusCode::BAD_REQUEST,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
        }
    }
}

impl From<KeySetError> for AuthError {
    fn from(e: KeySetError) -> Self {
        Self::KeySetFetch(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_statuses_match_taxonomy() {
        let cases: [(AuthError, &str, StatusCode); 9] = [
            (
                AuthError::HeaderMissing,
                "authorization_header_missing",
                StatusCode::UNAUTHORIZED,
            ),
            (
                AuthError::InvalidEncoding,
                "invalid_header",
                StatusCode::UNAUTHORIZED,
            ),
            (
                AuthError::InvalidScheme,
                "invalid_header",
                StatusCode::UNAUTHORIZED,
            ),
            (
                AuthError::MissingKid,
                "invalid_header",
                StatusCode::UNAUTHORIZED,
            ),
            (
                AuthError::NoMatchingKey,
                "invalid_header",
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::TokenExpired,
                "token_expired",
                StatusCode::UNAUTHORIZED,
            ),
            (
                AuthError::InvalidClaims,
                "invalid_claims",
                StatusCode::UNAUTHORIZED,
            ),
            (
                AuthError::PermissionsMissing,
                "invalid_claims",
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::PermissionDenied,
                "unauthorized",
                StatusCode::FORBIDDEN,
            ),
        ];

        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.status(), status);
        }
    }
}
