/*
 * Responsibility
 * - The "authorized request" context visible to handlers
 * - The guard middleware verifies the token and stores this in request
 *   extensions; handlers only ever see the already-verified claims
 *
 * Notes
 * - Claims in here are trusted for exactly one request; nothing is cached
 *   or reused across requests
 */
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::auth::Claims;

#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub claims: Claims,
}

impl AuthCtx {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn subject(&self) -> Option<&str> {
        self.claims.sub.as_deref()
    }
}

/// Pulls the context the guard middleware inserted. A missing context means
/// the route was wired without its guard; reject rather than proceed
/// unauthenticated.
impl<S> FromRequestParts<S> for AuthCtx
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
