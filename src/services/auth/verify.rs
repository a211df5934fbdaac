//! RS256 access-token verification against the provider's published key set.
//!
//! The verifier is stateless per request: it reads the token's `kid` from the
//! unverified header, looks the key up in the fetched JWKS, and lets
//! `jsonwebtoken` check signature, expiry, issuer and audience in one call.
//! Each of those failures maps to its own diagnosable error code; anything
//! unexpected collapses to `invalid_header`/400 instead of crashing the
//! request.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::services::auth::bearer::extract_bearer_token;
use crate::services::auth::error::AuthError;
use crate::services::auth::jwks::KeySetFetcher;
use crate::services::auth::permissions::check_permission;

/// Decoded token payload.
///
/// `aud` stays a raw value because providers publish it as either a string or
/// an array; `jsonwebtoken` validates it against the expected audience before
/// we ever look at it. `permissions` is the provider's custom capability
/// claim and is only required by the enforcer, not the verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    #[serde(default)]
    pub aud: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

/// Verifies bearer tokens issued for this service.
///
/// Key material is never stored here; every verification resolves the
/// signing key through the injected fetcher. Issuer and audience are pinned
/// at construction, the algorithm whitelist is RS256 only.
pub struct Authenticator {
    fetcher: Arc<dyn KeySetFetcher>,
    issuer: String,
    audience: String,
    leeway: u64,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway", &self.leeway)
            .finish()
    }
}

impl Authenticator {
    pub fn new(
        fetcher: Arc<dyn KeySetFetcher>,
        domain: &str,
        audience: impl Into<String>,
        leeway: u64,
    ) -> Self {
        Self {
            fetcher,
            issuer: format!("https://{domain}/"),
            audience: audience.into(),
            leeway,
        }
    }

    /// Full guard pipeline: extract the bearer token from the raw header
    /// value, verify it, enforce the required permission. The entry point
    /// used by the authorization middleware.
    pub async fn authorize(
        &self,
        header: Option<&str>,
        permission: &str,
    ) -> Result<Claims, AuthError> {
        let token = extract_bearer_token(header)?;
        let claims = self.verify(token).await?;
        check_permission(permission, &claims)?;
        Ok(claims)
    }

    /// Verify a raw token string and return its decoded claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = jsonwebtoken::decode_header(token).map_err(|_| AuthError::Unparsable)?;
        let kid = header.kid.ok_or(AuthError::MissingKid)?;

        let keys = self.fetcher.fetch().await?;
        let jwk = keys.find(&kid).ok_or(AuthError::NoMatchingKey)?;

        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|_| AuthError::Unparsable)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.leeway = self.leeway;

        let data = jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidAudience
                | ErrorKind::InvalidIssuer
                | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
                _ => AuthError::Unparsable,
            })?;

        Ok(data.claims)
    }
}
