//! Registration, login, and profile integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn register_success() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/users/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "correct horse battery",
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["balance_cents"], 0);
    assert_eq!(body["role"], "user");
    // The hash must never leak through the API.
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn register_duplicate_username_conflicts() {
    let harness = TestHarness::new();
    harness.register_and_login("alice").await;

    let response = harness
        .server
        .post("/api/users/register")
        .json(&json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "correct horse battery",
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn register_duplicate_email_conflicts() {
    let harness = TestHarness::new();
    harness.register_and_login("alice").await;

    let response = harness
        .server
        .post("/api/users/register")
        .json(&json!({
            "username": "bob",
            "email": "Alice@Example.com",
            "password": "correct horse battery",
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_rejects_bad_input() {
    let harness = TestHarness::new();

    for body in [
        json!({ "username": " ", "email": "a@example.com", "password": "long enough pw" }),
        json!({ "username": "bob", "email": "not-an-email", "password": "long enough pw" }),
        json!({ "username": "bob", "email": "b@example.com", "password": "short" }),
    ] {
        harness
            .server
            .post("/api/users/register")
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn login_returns_token_usable_for_auth() {
    let harness = TestHarness::new();
    let session = harness.register_and_login("alice").await;

    let response = harness
        .server
        .get("/api/users/me")
        .add_header("authorization", session.auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["id"], session.user_id.to_string());
}

#[tokio::test]
async fn login_wrong_password_unauthorized() {
    let harness = TestHarness::new();
    harness.register_and_login("alice").await;

    let response = harness
        .server
        .post("/api/users/login")
        .json(&json!({ "username": "alice", "password": "wrong password!" }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn login_unknown_user_unauthorized() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/users/login")
        .json(&json!({ "username": "nobody", "password": "whatever pass" }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn me_without_token_unauthorized() {
    let harness = TestHarness::new();

    harness
        .server
        .get("/api/users/me")
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn me_with_garbage_token_unauthorized() {
    let harness = TestHarness::new();

    harness
        .server
        .get("/api/users/me")
        .add_header("authorization", "Bearer not.a.token")
        .await
        .assert_status_unauthorized();
}

// ============================================================================
// Balance
// ============================================================================

#[tokio::test]
async fn top_up_increases_balance() {
    let harness = TestHarness::new();
    let session = harness.register_and_login("alice").await;

    harness.top_up(&session, 2500).await;
    harness.top_up(&session, 500).await;

    let response = harness
        .server
        .get("/api/users/me")
        .add_header("authorization", session.auth_header())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["balance_cents"], 3000);
    assert_eq!(body["balance_formatted"], "$30.00");
}

#[tokio::test]
async fn top_up_rejects_non_positive_amounts() {
    let harness = TestHarness::new();
    let session = harness.register_and_login("alice").await;

    for amount in [0, -100] {
        harness
            .server
            .post("/api/users/balance")
            .add_header("authorization", session.auth_header())
            .json(&json!({ "amount_cents": amount }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
