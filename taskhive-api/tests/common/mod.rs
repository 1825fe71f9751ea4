//! Shared test harness for the API integration tests
//!
//! Builds the real router over the in-memory store and the recording mailer,
//! so the whole HTTP surface runs hermetically: no database, no SMTP server.
#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::Service as _;
use uuid::Uuid;

use taskhive_api::app::{build_router, AppState};
use taskhive_api::config::{ApiConfig, Config, JwtConfig};
use taskhive_shared::auth::{jwt, password};
use taskhive_shared::mail::MemoryMailer;
use taskhive_shared::models::User;
use taskhive_shared::store::{MemStore, Store};

/// Signing secret shared by the test server and token helpers.
pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Password every seeded account uses.
pub const PASSWORD: &str = "a-fine-password-123";

// Argon2id is deliberately slow; hash the shared test password once.
static PASSWORD_HASH: OnceLock<String> = OnceLock::new();

fn password_hash() -> String {
    PASSWORD_HASH
        .get_or_init(|| password::hash_password(PASSWORD).expect("hashing test password"))
        .clone()
}

pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemStore>,
    pub mailer: Arc<MemoryMailer>,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemStore::new());
        Self::with_store(store.clone() as Arc<dyn Store>, store)
    }

    /// Builds the router over a caller-supplied store. `mem` backs the
    /// seeding helpers and must be what `app_store` ultimately writes to.
    pub fn with_store(app_store: Arc<dyn Store>, mem: Arc<MemStore>) -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database_url: None,
            jwt: JwtConfig {
                secret: JWT_SECRET.to_string(),
            },
            smtp: None,
            frontend_url: "http://localhost:5173".to_string(),
        };

        let mailer = Arc::new(MemoryMailer::new());
        let state = AppState::new(app_store, mailer.clone(), config);

        Self {
            app: build_router(state),
            store: mem,
            mailer,
        }
    }

    /// Sends a request and returns status plus parsed JSON body.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, token, None).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("DELETE", uri, token, None).await
    }

    /// Seeds an account directly in the store, bypassing the HTTP flows.
    pub async fn seed_user(&self, name: &str, email: &str, confirmed: bool) -> User {
        let mut user = User::new(name, email, password_hash());
        user.confirmed = confirmed;
        self.store.insert_user(&user).await.unwrap();
        user
    }

    /// Mints a valid session token for a seeded account.
    pub fn session_for(&self, user_id: Uuid) -> String {
        jwt::create_token(&jwt::Claims::new(user_id), JWT_SECRET).unwrap()
    }

    /// Pulls the six-digit code out of the most recent email.
    pub fn latest_code(&self) -> String {
        let sent = self.mailer.sent();
        let mail = sent.last().expect("no mail was sent");
        extract_code(&mail.html)
    }
}

/// Finds the first run of six consecutive ASCII digits.
pub fn extract_code(html: &str) -> String {
    let bytes = html.as_bytes();
    for start in 0..bytes.len().saturating_sub(5) {
        let window = &bytes[start..start + 6];
        if window.iter().all(|b| b.is_ascii_digit()) {
            return String::from_utf8_lossy(window).to_string();
        }
    }
    panic!("no six-digit code in mail body: {html}");
}
