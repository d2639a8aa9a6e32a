use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use socialmedia_api::config::{AppConfig, StoreBackend};
use socialmedia_api::store::MemoryStore;
use socialmedia_api::{router, AppState};
use socialmedia_shared::types::auth::{Claims, UserId};

pub const SECRET: &str = "integration-secret";

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_csrf(true)
    }

    pub fn with_csrf(require_csrf: bool) -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = AppConfig {
            jwt_secret: SECRET.to_string(),
            store: StoreBackend::Memory,
            require_csrf,
            ..AppConfig::default()
        };
        let router = router(AppState::new(config, store.clone()));
        Self { store, router }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        user: UserId,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        self.send(request(method, uri, Some(user), body)).await
    }
}

pub fn token_for(user: UserId) -> String {
    Claims::new(user, 3600).encode(SECRET).unwrap()
}

/// Authenticated request carrying a CSRF token.
pub fn request(method: Method, uri: &str, user: Option<UserId>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-CSRFToken", "test-csrf-token");
    if let Some(user) = user {
        builder = builder.header("Authorization", format!("Bearer {}", token_for(user)));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

pub fn slugs(body: &serde_json::Value) -> Vec<String> {
    body["data"]["notifs"]
        .as_array()
        .expect("notifs array")
        .iter()
        .map(|n| n["slug"].as_str().unwrap().to_string())
        .collect()
}
