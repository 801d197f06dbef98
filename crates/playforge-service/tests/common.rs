//! Common test utilities for playforge integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use playforge_core::{Role, UserId};
use playforge_service::{create_router, AppState, ServiceConfig};
use playforge_store::{RocksStore, Store};

/// A registered test user with a live session token.
pub struct Session {
    /// Bearer token from login.
    pub token: String,
    /// The user's ID.
    pub user_id: UserId,
}

impl Session {
    /// Authorization header value.
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct store handle for fixture setup (e.g. granting admin).
    pub store: Arc<RocksStore>,
    /// Temporary database directory (kept alive for the test duration).
    pub _data_dir: TempDir,
    /// Temporary uploaded-content directory.
    pub content_dir: TempDir,
    /// Temporary serving-cache directory.
    pub serve_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a harness with purchase-notification mail pointed at `mail_url`.
    pub fn with_mail(mail_url: &str) -> Self {
        Self::build(Some(mail_url.to_string()))
    }

    fn build(mail_url: Option<String>) -> Self {
        let data_dir = TempDir::new().expect("Failed to create temp directory");
        let content_dir = TempDir::new().expect("Failed to create content directory");
        let serve_dir = TempDir::new().expect("Failed to create serve directory");
        let store = Arc::new(RocksStore::open(data_dir.path()).expect("Failed to open store"));

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: data_dir.path().to_string_lossy().to_string(),
            content_dir: content_dir.path().to_string_lossy().to_string(),
            serve_dir: serve_dir.path().to_string_lossy().to_string(),
            jwt_secret: "test-secret".into(),
            jwt_issuer: "playforge".into(),
            jwt_audience: "playforge".into(),
            token_ttl_days: 7,
            // Minimum cost keeps registration fast in tests.
            bcrypt_cost: 4,
            mail_api_key: mail_url.as_ref().map(|_| "test-mail-key".to_string()),
            mail_api_url: mail_url,
            mail_from: "noreply@playforge.test".into(),
            recommendation_limit: 10,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(Arc::clone(&store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            _data_dir: data_dir,
            content_dir,
            serve_dir,
        }
    }

    /// Register a user and log them in.
    pub async fn register_and_login(&self, username: &str) -> Session {
        self.server
            .post("/api/users/register")
            .json(&json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "correct horse battery",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let response = self
            .server
            .post("/api/users/login")
            .json(&json!({
                "username": username,
                "password": "correct horse battery",
            }))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        let user_id = body["user"]["id"]
            .as_str()
            .expect("login response has user id")
            .parse()
            .expect("user id parses");

        Session {
            token: body["token"].as_str().expect("login returns token").to_string(),
            user_id,
        }
    }

    /// Grant a user the admin role directly through the store.
    pub fn make_admin(&self, user_id: UserId) {
        self.store
            .set_role(user_id, Role::Admin)
            .expect("Failed to set admin role");
    }

    /// Top up a user's balance through the API.
    pub async fn top_up(&self, session: &Session, amount_cents: i64) {
        self.server
            .post("/api/users/balance")
            .add_header("authorization", session.auth_header())
            .json(&json!({ "amount_cents": amount_cents }))
            .await
            .assert_status(axum::http::StatusCode::NO_CONTENT);
    }

    /// Publish a game through the API, returning its id.
    pub async fn publish_game(
        &self,
        session: &Session,
        name: &str,
        price_cents: i64,
        genres: &str,
    ) -> String {
        let response = self
            .server
            .post("/api/games")
            .add_header("authorization", session.auth_header())
            .json(&json!({
                "name": name,
                "price_cents": price_cents,
                "genres": genres,
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        body["id"].as_str().expect("game response has id").to_string()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
