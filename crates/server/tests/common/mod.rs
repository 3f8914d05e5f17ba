#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! [`TestApp`] wraps the REAL router from `customers_server::routes::app`,
//! with a static secret source and an in-memory store seeded per test.
//! Requests go through `tower::ServiceExt::oneshot`, so no socket is bound.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use customers_server::config::SecretsConfig;
use customers_server::services::{SecretMap, SecretSource, StaticSecretSource};
use customers_server::store::InMemoryCustomerStore;
use customers_server::{AppState, Config, routes};
use customers_test_utils::{TEST_JWT_SECRET, login_form, test_secrets};

/// Configuration for tests: proxy headers trusted so each test can pick its
/// own rate-limit bucket, and a permit limit high enough for CRUD flows.
pub fn test_config() -> Config {
    Config {
        port: 0,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        token_expiration: Duration::from_secs(30 * 60),
        rate_limit_permits: 1_000,
        rate_limit_window: Duration::from_secs(1),
        trust_forwarded_for: true,
        secrets: SecretsConfig::Empty,
        secrets_timeout: Duration::from_secs(1),
        secrets_cache_ttl: None,
        seed_demo_customers: false,
        cors_allowed_origins: vec!["*".to_string()],
    }
}

/// Static secret source that counts fetches.
#[derive(Default)]
pub struct CountingSecretSource {
    inner: StaticSecretSource,
    pub fetches: AtomicUsize,
}

impl CountingSecretSource {
    pub fn new() -> Self {
        Self {
            inner: test_secrets().into_iter().collect(),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretSource for CountingSecretSource {
    async fn fetch(&self) -> anyhow::Result<SecretMap> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch().await
    }

    fn kind(&self) -> &'static str {
        "counting"
    }
}

/// Secret source whose backend is always down.
pub struct UnreachableSecretSource;

#[async_trait]
impl SecretSource for UnreachableSecretSource {
    async fn fetch(&self) -> anyhow::Result<SecretMap> {
        anyhow::bail!("secretsmanager.internal: connection refused")
    }

    fn kind(&self) -> &'static str {
        "unreachable"
    }
}

/// Test application wrapper using the REAL routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// App seeded with `names` as ids 1.., using the test credentials.
    pub fn with_customers(names: &[&str]) -> Self {
        Self::build(names, Arc::new(CountingSecretSource::new()), test_config())
    }

    /// App with an explicit secret source and configuration.
    pub fn build(names: &[&str], secrets: Arc<dyn SecretSource>, config: Config) -> Self {
        let store = Arc::new(InMemoryCustomerStore::seeded(names.iter().copied()));
        let state = AppState::with_components(store, secrets, &config);
        let router = routes::app(state.clone());
        Self { router, state }
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// POST /login from `client` and return the raw response.
    pub async fn login_response(&self, client: &str, name: &str, password: &str) -> Response {
        self.request(
            Request::post("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header("x-forwarded-for", client)
                .body(Body::from(login_form(name, password)))
                .unwrap(),
        )
        .await
    }

    /// Log in from `client` and return the bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the login response is not 200 OK.
    pub async fn login(&self, client: &str, name: &str, password: &str) -> String {
        let response = self.login_response(client, name, password).await;
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Login failed for '{name}' (status {})",
            response.status()
        );
        let body = response_json(response).await;
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Send an authenticated request with an optional JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        client: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", client);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.request(request).await
    }
}

pub async fn response_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        let text = String::from_utf8_lossy(&body);
        panic!("Failed to parse JSON: {text}");
    })
}

pub async fn response_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).to_string()
}
