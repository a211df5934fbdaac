/*
 * Responsibility
 * - Pull the raw bearer token out of an Authorization header value
 * - Purely syntactic; signature/claim checks live in verify.rs
 */
use crate::services::auth::error::AuthError;

/// Extract the bearer token from the raw `Authorization` header value.
///
/// `None` means the header was absent from the request. The header must be
/// exactly `<scheme> <token>` where the scheme is a case-insensitive
/// `Bearer`. The token itself is returned verbatim; no further validation
/// happens here.
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::HeaderMissing)?;

    let mut parts = value.split_whitespace();

    let scheme = parts.next().ok_or(AuthError::InvalidScheme)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidScheme);
    }

    let token = parts.next().ok_or(AuthError::TokenNotFound)?;

    if parts.next().is_some() {
        return Err(AuthError::TooManyParts);
    }

    Ok(token)
}
