//! Play-time tracking and game content serving integration tests.

mod common;

use axum::http::StatusCode;
use common::{Session, TestHarness};
use serde_json::json;

/// Seed uploaded content for a game under the content directory.
fn seed_content(harness: &TestHarness, game_id: &str) {
    let dir = harness.content_dir.path().join(game_id);
    std::fs::create_dir_all(dir.join("assets")).expect("create content dirs");
    std::fs::write(dir.join("index.html"), "<html>orbit</html>").expect("write index");
    std::fs::write(dir.join("assets/engine.wasm"), b"\0asm").expect("write wasm");
}

/// Publish a game and have `buyer` purchase it.
async fn published_and_purchased(harness: &TestHarness, seller: &Session, buyer: &Session) -> String {
    let game_id = harness.publish_game(seller, "Orbit", 100, "Arcade").await;
    harness.top_up(buyer, 1000).await;
    harness
        .server
        .post(&format!("/api/users/purchase/{game_id}"))
        .add_header("authorization", buyer.auth_header())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    game_id
}

// ============================================================================
// Play time
// ============================================================================

#[tokio::test]
async fn play_time_accumulates_and_reports_minutes() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;
    let player = harness.register_and_login("alice").await;
    let game_id = published_and_purchased(&harness, &seller, &player).await;

    for seconds in [120, 45] {
        harness
            .server
            .post("/api/play/time")
            .add_header("authorization", player.auth_header())
            .json(&json!({ "game_id": game_id, "seconds_played": seconds }))
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }

    let report: serde_json::Value = harness
        .server
        .get("/api/play/time/me")
        .add_header("authorization", player.auth_header())
        .await
        .json();
    let report = report.as_array().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0]["game_id"], game_id);
    assert_eq!(report[0]["game_title"], "Orbit");
    // 165 seconds rounds to 3 minutes.
    assert_eq!(report[0]["minutes_played"], 3);
}

#[tokio::test]
async fn play_time_rejects_non_positive_seconds() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;
    let player = harness.register_and_login("alice").await;
    let game_id = published_and_purchased(&harness, &seller, &player).await;

    for seconds in [0, -30] {
        harness
            .server
            .post("/api/play/time")
            .add_header("authorization", player.auth_header())
            .json(&json!({ "game_id": game_id, "seconds_played": seconds }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn play_time_unknown_game_not_found() {
    let harness = TestHarness::new();
    let player = harness.register_and_login("alice").await;

    harness
        .server
        .post("/api/play/time")
        .add_header("authorization", player.auth_header())
        .json(&json!({
            "game_id": "00000000-0000-4000-8000-000000000000",
            "seconds_played": 60,
        }))
        .await
        .assert_status_not_found();
}

// ============================================================================
// Content serving
// ============================================================================

#[tokio::test]
async fn owner_gets_staged_content_with_content_types() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;
    let buyer = harness.register_and_login("alice").await;
    let game_id = published_and_purchased(&harness, &seller, &buyer).await;
    seed_content(&harness, &game_id);

    let response = harness
        .server
        .get(&format!("/api/play/{game_id}/index.html"))
        .add_header("authorization", buyer.auth_header())
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "text/html");
    assert_eq!(response.text(), "<html>orbit</html>");

    // Nested file, staged by the first request
    let response = harness
        .server
        .get(&format!("/api/play/{game_id}/assets/engine.wasm"))
        .add_header("authorization", buyer.auth_header())
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/wasm");

    // The staging cache now holds a copy
    assert!(harness
        .serve_dir
        .path()
        .join(&game_id)
        .join("index.html")
        .is_file());
}

#[tokio::test]
async fn creator_can_access_without_purchase() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;
    let game_id = harness.publish_game(&seller, "Orbit", 100, "Arcade").await;
    seed_content(&harness, &game_id);

    harness
        .server
        .get(&format!("/api/play/{game_id}/index.html"))
        .add_header("authorization", seller.auth_header())
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn non_owner_forbidden() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;
    let stranger = harness.register_and_login("mallory").await;
    let game_id = harness.publish_game(&seller, "Orbit", 100, "Arcade").await;
    seed_content(&harness, &game_id);

    harness
        .server
        .get(&format!("/api/play/{game_id}/index.html"))
        .add_header("authorization", stranger.auth_header())
        .await
        .assert_status_forbidden();
}

#[tokio::test]
async fn traversal_and_missing_files_not_found() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;
    let buyer = harness.register_and_login("alice").await;
    let game_id = published_and_purchased(&harness, &seller, &buyer).await;
    seed_content(&harness, &game_id);

    // Something outside the staging root that a traversal could reach
    std::fs::write(harness.serve_dir.path().join("secret.txt"), "x").unwrap();

    harness
        .server
        .get(&format!("/api/play/{game_id}/missing.html"))
        .add_header("authorization", buyer.auth_header())
        .await
        .assert_status_not_found();

    harness
        .server
        .get(&format!("/api/play/{game_id}/..%2Fsecret.txt"))
        .add_header("authorization", buyer.auth_header())
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn unstaged_game_without_content_not_found() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;
    let buyer = harness.register_and_login("alice").await;
    let game_id = published_and_purchased(&harness, &seller, &buyer).await;
    // No seed_content: nothing was uploaded.

    harness
        .server
        .get(&format!("/api/play/{game_id}/index.html"))
        .add_header("authorization", buyer.auth_header())
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn concurrent_first_requests_stage_once() {
    let harness = TestHarness::new();
    let seller = harness.register_and_login("studio").await;
    let buyer = harness.register_and_login("alice").await;
    let game_id = published_and_purchased(&harness, &seller, &buyer).await;
    seed_content(&harness, &game_id);

    let url = format!("/api/play/{game_id}/index.html");
    let (a, b) = tokio::join!(
        async {
            harness
                .server
                .get(&url)
                .add_header("authorization", buyer.auth_header())
                .await
        },
        async {
            harness
                .server
                .get(&url)
                .add_header("authorization", buyer.auth_header())
                .await
        },
    );
    a.assert_status_ok();
    b.assert_status_ok();
    assert_eq!(a.text(), "<html>orbit</html>");
    assert_eq!(b.text(), "<html>orbit</html>");
}
