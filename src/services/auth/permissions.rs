/*
 * Responsibility
 * - Capability check against the token's custom `permissions` claim
 * - An empty required capability means the route only needs a valid token
 */
use crate::services::auth::error::AuthError;
use crate::services::auth::verify::Claims;

pub fn check_permission(required: &str, claims: &Claims) -> Result<(), AuthError> {
    let permissions = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::PermissionsMissing)?;

    if required.is_empty() {
        return Ok(());
    }

    if !permissions.iter().any(|p| p == required) {
        return Err(AuthError::PermissionDenied);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with(permissions: Option<Vec<&str>>) -> Claims {
        Claims {
            iss: "https://tenant.example.auth0.com/".to_string(),
            aud: serde_json::Value::String("drinks".to_string()),
            sub: Some("auth0|user".to_string()),
            exp: u64::MAX,
            iat: None,
            permissions: permissions.map(|p| p.into_iter().map(str::to_string).collect()),
        }
    }

    #[test]
    fn present_capability_passes() {
        let claims = claims_with(Some(vec!["get:drinks-detail"]));
        check_permission("get:drinks-detail", &claims).expect("capability present");
    }

    #[test]
    fn absent_capability_is_forbidden() {
        let claims = claims_with(Some(vec!["get:drinks-detail"]));
        let err = check_permission("post:drinks", &claims).expect_err("capability absent");
        assert!(matches!(err, AuthError::PermissionDenied));
        assert_eq!(err.code(), "unauthorized");
        assert_eq!(err.status().as_u16(), 403);
    }

    #[test]
    fn missing_permissions_claim_is_invalid() {
        let claims = claims_with(None);
        let err = check_permission("get:drinks-detail", &claims).expect_err("claim missing");
        assert!(matches!(err, AuthError::PermissionsMissing));
        assert_eq!(err.code(), "invalid_claims");
        assert_eq!(err.status().as_u16(), 400);
    }

    #[test]
    fn missing_claim_fails_even_without_required_capability() {
        let claims = claims_with(None);
        let err = check_permission("", &claims).expect_err("claim missing");
        assert!(matches!(err, AuthError::PermissionsMissing));
    }

    #[test]
    fn empty_required_capability_skips_membership_check() {
        let claims = claims_with(Some(vec![]));
        check_permission("", &claims).expect("no capability required");
    }
}
