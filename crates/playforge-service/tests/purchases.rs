//! Purchase flow and ledger integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

// ============================================================================
// Purchase
// ============================================================================

#[tokio::test]
async fn purchase_transfers_balance_and_grants_game() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;
    let buyer = harness.register_and_login("alice").await;

    let game_id = harness.publish_game(&seller, "Orbit", 600, "Arcade").await;
    harness.top_up(&buyer, 1000).await;

    harness
        .server
        .post(&format!("/api/users/purchase/{game_id}"))
        .add_header("authorization", buyer.auth_header())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // Buyer debited, game in library
    let me: serde_json::Value = harness
        .server
        .get("/api/users/me")
        .add_header("authorization", buyer.auth_header())
        .await
        .json();
    assert_eq!(me["balance_cents"], 400);
    assert_eq!(me["owned_games"], json!([game_id]));

    // Seller credited
    let seller_me: serde_json::Value = harness
        .server
        .get("/api/users/me")
        .add_header("authorization", seller.auth_header())
        .await
        .json();
    assert_eq!(seller_me["balance_cents"], 600);

    // Library lists the game itself
    let library: serde_json::Value = harness
        .server
        .get("/api/users/me/library")
        .add_header("authorization", buyer.auth_header())
        .await
        .json();
    assert_eq!(library.as_array().unwrap().len(), 1);
    assert_eq!(library[0]["name"], "Orbit");
}

#[tokio::test]
async fn repurchase_is_idempotent() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;
    let buyer = harness.register_and_login("alice").await;

    let game_id = harness.publish_game(&seller, "Orbit", 600, "Arcade").await;
    harness.top_up(&buyer, 2000).await;

    for _ in 0..2 {
        harness
            .server
            .post(&format!("/api/users/purchase/{game_id}"))
            .add_header("authorization", buyer.auth_header())
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }

    // Charged exactly once
    let me: serde_json::Value = harness
        .server
        .get("/api/users/me")
        .add_header("authorization", buyer.auth_header())
        .await
        .json();
    assert_eq!(me["balance_cents"], 1400);
    assert_eq!(me["owned_games"].as_array().unwrap().len(), 1);

    let transactions: serde_json::Value = harness
        .server
        .get("/api/users/transactions")
        .add_header("authorization", buyer.auth_header())
        .await
        .json();
    assert_eq!(transactions.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn purchase_insufficient_funds_rejected_with_details() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;
    let buyer = harness.register_and_login("alice").await;

    let game_id = harness.publish_game(&seller, "Orbit", 600, "Arcade").await;
    harness.top_up(&buyer, 599).await;

    let response = harness
        .server
        .post(&format!("/api/users/purchase/{game_id}"))
        .add_header("authorization", buyer.auth_header())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_funds");
    assert_eq!(body["error"]["details"]["balance"], 599);
    assert_eq!(body["error"]["details"]["required"], 600);

    // Nothing changed
    let me: serde_json::Value = harness
        .server
        .get("/api/users/me")
        .add_header("authorization", buyer.auth_header())
        .await
        .json();
    assert_eq!(me["balance_cents"], 599);
    assert!(me["owned_games"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn self_purchase_forbidden() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;

    let game_id = harness.publish_game(&seller, "Orbit", 600, "Arcade").await;
    harness.top_up(&seller, 1000).await;

    let response = harness
        .server
        .post(&format!("/api/users/purchase/{game_id}"))
        .add_header("authorization", seller.auth_header())
        .await;

    response.assert_status_forbidden();

    let me: serde_json::Value = harness
        .server
        .get("/api/users/me")
        .add_header("authorization", seller.auth_header())
        .await
        .json();
    assert_eq!(me["balance_cents"], 1000);
}

#[tokio::test]
async fn purchase_unknown_game_not_found() {
    let harness = TestHarness::new();
    let buyer = harness.register_and_login("alice").await;

    harness
        .server
        .post("/api/users/purchase/00000000-0000-4000-8000-000000000000")
        .add_header("authorization", buyer.auth_header())
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn purchase_invalid_game_id_bad_request() {
    let harness = TestHarness::new();
    let buyer = harness.register_and_login("alice").await;

    harness
        .server
        .post("/api/users/purchase/not-a-uuid")
        .add_header("authorization", buyer.auth_header())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Ledger
// ============================================================================

#[tokio::test]
async fn ledger_visible_to_both_parties_with_snapshots() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;
    let buyer = harness.register_and_login("alice").await;

    let game_id = harness.publish_game(&seller, "Orbit", 300, "Arcade").await;
    harness.top_up(&buyer, 1000).await;
    harness
        .server
        .post(&format!("/api/users/purchase/{game_id}"))
        .add_header("authorization", buyer.auth_header())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // Rename the game after the purchase; the ledger keeps the old title.
    harness
        .server
        .put(&format!("/api/games/{game_id}"))
        .add_header("authorization", seller.auth_header())
        .json(&json!({ "name": "Orbit Remastered" }))
        .await
        .assert_status_ok();

    for session in [&buyer, &seller] {
        let entries: serde_json::Value = harness
            .server
            .get("/api/users/transactions")
            .add_header("authorization", session.auth_header())
            .await
            .json();
        let entries = entries.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["buyer_username"], "alice");
        assert_eq!(entries[0]["seller_username"], "studio");
        assert_eq!(entries[0]["game_title"], "Orbit");
        assert_eq!(entries[0]["amount_cents"], 300);
    }
}

#[tokio::test]
async fn ledger_lists_newest_first() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;
    let buyer = harness.register_and_login("alice").await;

    let first = harness.publish_game(&seller, "First", 100, "Arcade").await;
    let second = harness.publish_game(&seller, "Second", 100, "Arcade").await;
    harness.top_up(&buyer, 1000).await;

    for game_id in [&first, &second] {
        harness
            .server
            .post(&format!("/api/users/purchase/{game_id}"))
            .add_header("authorization", buyer.auth_header())
            .await
            .assert_status(StatusCode::NO_CONTENT);
        // Distinct ULID timestamps
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let entries: serde_json::Value = harness
        .server
        .get("/api/users/transactions")
        .add_header("authorization", buyer.auth_header())
        .await
        .json();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["game_title"], "Second");
    assert_eq!(entries[1]["game_title"], "First");
}

// ============================================================================
// Admin views
// ============================================================================

#[tokio::test]
async fn admin_sees_full_ledger_and_users() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;
    let buyer = harness.register_and_login("alice").await;
    let admin = harness.register_and_login("root").await;
    harness.make_admin(admin.user_id);

    let game_id = harness.publish_game(&seller, "Orbit", 100, "Arcade").await;
    harness.top_up(&buyer, 1000).await;
    harness
        .server
        .post(&format!("/api/users/purchase/{game_id}"))
        .add_header("authorization", buyer.auth_header())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let ledger: serde_json::Value = harness
        .server
        .get("/api/admin/transactions")
        .add_header("authorization", admin.auth_header())
        .await
        .json();
    assert_eq!(ledger.as_array().unwrap().len(), 1);

    let users: serde_json::Value = harness
        .server
        .get("/api/admin/users")
        .add_header("authorization", admin.auth_header())
        .await
        .json();
    assert_eq!(users.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn admin_endpoints_forbidden_for_regular_users() {
    let harness = TestHarness::new();
    let user = harness.register_and_login("alice").await;

    harness
        .server
        .get("/api/admin/transactions")
        .add_header("authorization", user.auth_header())
        .await
        .assert_status_forbidden();

    harness
        .server
        .get("/api/admin/users")
        .add_header("authorization", user.auth_header())
        .await
        .assert_status_forbidden();
}

#[tokio::test]
async fn promote_then_demote_changes_role() {
    let harness = TestHarness::new();
    let admin = harness.register_and_login("root").await;
    harness.make_admin(admin.user_id);
    let user = harness.register_and_login("alice").await;

    let promoted: serde_json::Value = harness
        .server
        .post(&format!("/api/admin/users/{}/promote", user.user_id))
        .add_header("authorization", admin.auth_header())
        .await
        .json();
    assert_eq!(promoted["role"], "admin");

    let demoted: serde_json::Value = harness
        .server
        .post(&format!("/api/admin/users/{}/demote", user.user_id))
        .add_header("authorization", admin.auth_header())
        .await
        .json();
    assert_eq!(demoted["role"], "user");
}
