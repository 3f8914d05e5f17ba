//! Bearer token authentication middleware.
//!
//! Guards every customer route: the request must carry
//! `Authorization: Bearer <token>` with a valid, unexpired token, or it is
//! answered with 401 and never reaches a handler.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Middleware that requires a valid bearer token.
///
/// On success the principal is stored in request extensions as
/// [`BearerAuth`].
pub async fn require_bearer_token(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        debug!(path = %request.uri().path(), "missing bearer token");
        return AppError::Unauthorized.into_response();
    };

    let claims = match state.tokens().verify(token) {
        Ok(c) => c,
        Err(e) => {
            debug!(error = %e, "invalid bearer token");
            return AppError::Unauthorized.into_response();
        }
    };

    request.extensions_mut().insert(BearerAuth {
        name: claims.sub,
        jti: claims.jti,
    });

    next.run(request).await
}

/// Extract the token from an `Authorization: Bearer` header.
fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authenticated principal extracted from a valid token.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    /// Login name the token was issued to.
    pub name: String,
    /// Token id.
    pub jti: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn request_with(header: Option<&str>) -> Request<Body> {
        let mut builder = Request::get("/customer");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn extracts_bearer_token() {
        let request = request_with(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&request), Some("abc.def.ghi"));
    }

    #[tokio::test]
    async fn principal_carries_token_claims() {
        use std::sync::Arc;
        use std::time::Duration;

        use axum::{Extension, Router, middleware::from_fn_with_state, routing::get};
        use http_body_util::BodyExt;
        use tower::ServiceExt;

        use crate::config::{Config, SecretsConfig};
        use crate::services::StaticSecretSource;
        use crate::store::InMemoryCustomerStore;

        let config = Config {
            port: 0,
            jwt_secret: "unit-test-secret-key-at-least-32-bytes".to_string(),
            token_expiration: Duration::from_secs(60),
            rate_limit_permits: 5,
            rate_limit_window: Duration::from_secs(1),
            trust_forwarded_for: false,
            secrets: SecretsConfig::Empty,
            secrets_timeout: Duration::from_secs(1),
            secrets_cache_ttl: None,
            seed_demo_customers: false,
            cors_allowed_origins: vec!["*".to_string()],
        };
        let state = AppState::with_components(
            Arc::new(InMemoryCustomerStore::new()),
            Arc::new(StaticSecretSource::default()),
            &config,
        );
        let issued = state.tokens().issue("admin").unwrap();
        let claims = state.tokens().verify(&issued.access_token).unwrap();

        let app = Router::new()
            .route(
                "/whoami",
                get(|Extension(auth): Extension<BearerAuth>| async move {
                    format!("{}:{}", auth.name, auth.jti)
                }),
            )
            .route_layer(from_fn_with_state(state.clone(), require_bearer_token))
            .with_state(state);

        let response = app
            .oneshot(
                Request::get("/whoami")
                    .header(AUTHORIZATION, format!("Bearer {}", issued.access_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, format!("admin:{}", claims.jti).as_bytes());
    }

    #[test]
    fn ignores_other_schemes_and_blanks() {
        assert_eq!(bearer_token(&request_with(None)), None);
        assert_eq!(bearer_token(&request_with(Some("Basic Zm9vOmJhcg=="))), None);
        assert_eq!(bearer_token(&request_with(Some("Bearer   "))), None);
    }
}
