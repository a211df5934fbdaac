//! Permission guard: bearer extraction → token verification → capability
//! check, then hand the decoded claims to the handler via request extensions.
//!
//! Layered per-handler so each protected route names its own required
//! capability:
//!
//! ```ignore
//! .route(
//!     "/drinks-detail",
//!     get(list_drinks_detail.layer(middleware::from_fn_with_state(
//!         RequirePermission::new(auth, "get:drinks-detail"),
//!         require_permission,
//!     ))),
//! )
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{AuthError, Authenticator};

/// State for the guard: which capability this route demands.
#[derive(Clone)]
pub struct RequirePermission {
    auth: Arc<Authenticator>,
    permission: &'static str,
}

impl RequirePermission {
    pub fn new(auth: Arc<Authenticator>, permission: &'static str) -> Self {
        Self { auth, permission }
    }
}

/// The guard itself. Any authorization failure short-circuits here; the
/// wrapped handler never runs.
pub async fn require_permission(
    State(guard): State<RequirePermission>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // A header that is present but not valid UTF-8 is rejected as malformed,
    // not treated as missing.
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().map_err(|_| AuthError::InvalidEncoding))
        .transpose();

    let result = match header {
        Ok(header) => guard.auth.authorize(header, guard.permission).await,
        Err(err) => Err(err),
    };

    let claims = match result {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                code = err.code(),
                permission = guard.permission,
                error = %err,
                "authorization failed"
            );
            return Err(err.into());
        }
    };

    // Guard → extractor hand-off; claims live only for this request.
    req.extensions_mut().insert(AuthCtx::new(claims));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::handler::Handler;
    use axum::routing::get;
    use axum::{Router, middleware};
    use tower::ServiceExt;

    use crate::services::auth::test_keys;
    use crate::services::auth::verify::Claims;

    const DOMAIN: &str = "tenant.example.auth0.com";
    const AUDIENCE: &str = "drinks";

    async fn ok_handler(ctx: AuthCtx) -> String {
        // Echo something claim-derived so tests can assert the handler saw
        // the verified payload.
        format!("ok:{}", ctx.claims.sub.as_deref().unwrap_or("anonymous"))
    }

    fn guarded_app(permission: &'static str) -> Router {
        let auth = Arc::new(Authenticator::new(
            Arc::new(test_keys::fetcher()),
            DOMAIN,
            AUDIENCE,
            0,
        ));

        Router::new().route(
            "/protected",
            get(ok_handler.layer(middleware::from_fn_with_state(
                RequirePermission::new(auth, permission),
                require_permission,
            ))),
        )
    }

    fn signed_token(permissions: Option<Vec<&str>>, exp_offset: i64) -> String {
        let now = test_keys::now_epoch_seconds() as i64;
        let claims = Claims {
            iss: format!("https://{DOMAIN}/"),
            aud: serde_json::Value::String(AUDIENCE.to_string()),
            sub: Some("auth0|barista".to_string()),
            exp: (now + exp_offset) as u64,
            iat: Some(now as u64),
            permissions: permissions.map(|p| p.into_iter().map(str::to_string).collect()),
        };
        test_keys::sign(&claims, Some(test_keys::KID))
    }

    async fn send(app: Router, authorization: Option<&str>) -> (u16, serde_json::Value, Vec<u8>) {
        let mut builder = Request::builder().uri("/protected");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let req = builder.body(Body::empty()).expect("request");

        let res = app.oneshot(req).await.expect("response");
        let status = res.status().as_u16();
        let bytes = axum::body::to_bytes(res.into_body(), 64 * 1024)
            .await
            .expect("body");
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json, bytes.to_vec())
    }

    #[tokio::test]
    async fn all_three_stages_passing_runs_the_handler() {
        let token = signed_token(Some(vec!["get:drinks-detail"]), 3600);
        let (status, _, body) = send(
            guarded_app("get:drinks-detail"),
            Some(&format!("Bearer {token}")),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body, b"ok:auth0|barista");
    }

    #[tokio::test]
    async fn missing_header_short_circuits() {
        let (status, json, _) = send(guarded_app("get:drinks-detail"), None).await;

        assert_eq!(status, 401);
        assert_eq!(json["code"], "authorization_header_missing");
        assert_eq!(json["description"], "Authorization header is expected.");
    }

    #[tokio::test]
    async fn malformed_header_short_circuits() {
        let (status, json, _) = send(guarded_app("get:drinks-detail"), Some("Token abc")).await;

        assert_eq!(status, 401);
        assert_eq!(json["code"], "invalid_header");
    }

    #[tokio::test]
    async fn non_utf8_header_short_circuits() {
        let value = axum::http::HeaderValue::from_bytes(b"Bearer \xFF\xFE").expect("header value");
        let req = Request::builder()
            .uri("/protected")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .expect("request");

        let res = guarded_app("get:drinks-detail")
            .oneshot(req)
            .await
            .expect("response");
        let status = res.status().as_u16();
        let bytes = axum::body::to_bytes(res.into_body(), 64 * 1024)
            .await
            .expect("body");
        let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");

        assert_eq!(status, 401);
        assert_eq!(json["code"], "invalid_header");
        assert_eq!(json["description"], "Authorization header is not valid UTF-8.");
    }

    #[tokio::test]
    async fn expired_token_short_circuits() {
        let token = signed_token(Some(vec!["get:drinks-detail"]), -3600);
        let (status, json, _) = send(
            guarded_app("get:drinks-detail"),
            Some(&format!("Bearer {token}")),
        )
        .await;

        assert_eq!(status, 401);
        assert_eq!(json["code"], "token_expired");
    }

    #[tokio::test]
    async fn missing_capability_short_circuits() {
        let token = signed_token(Some(vec!["get:drinks-detail"]), 3600);
        let (status, json, _) = send(
            guarded_app("post:drinks"),
            Some(&format!("Bearer {token}")),
        )
        .await;

        assert_eq!(status, 403);
        assert_eq!(json["code"], "unauthorized");
    }

    #[tokio::test]
    async fn missing_permissions_claim_short_circuits() {
        let token = signed_token(None, 3600);
        let (status, json, _) = send(
            guarded_app("post:drinks"),
            Some(&format!("Bearer {token}")),
        )
        .await;

        assert_eq!(status, 400);
        assert_eq!(json["code"], "invalid_claims");
    }
}
