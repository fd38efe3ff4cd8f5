//! Academic structure API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;

use common::fixtures;
use common::TestContext;

/// Test the level vocabulary round trip.
#[tokio::test]
#[ignore = "requires database"]
async fn test_level_vocabulary_round_trip() {
    let ctx = TestContext::new_without_storage().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (admin_id, admin_token) = ctx.create_admin().await;
    let code = fixtures::unique_code("1BAC");

    let response = server
        .put(&format!("/api/admin/levels/{}", code))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&admin_token),
        )
        .json(&serde_json::json!({
            "name_fr": "Première année bac",
            "name_ar": "الأولى باكالوريا",
            "position": 2,
        }))
        .await;
    response.assert_status_ok();

    let response = server
        .get("/api/admin/levels")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&admin_token),
        )
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let found = body
        .as_array()
        .unwrap()
        .iter()
        .any(|level| level["code"] == code);
    assert!(found);

    let response = server
        .delete(&format!("/api/admin/levels/{}", code))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&admin_token),
        )
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["deleted"], true);

    ctx.cleanup_user(admin_id).await;
}

/// Test a class can reference its level and branch codes.
#[tokio::test]
#[ignore = "requires database"]
async fn test_class_vocabulary() {
    let ctx = TestContext::new_without_storage().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (admin_id, admin_token) = ctx.create_admin().await;
    let level = fixtures::unique_code("TC");
    let class = fixtures::unique_code("TCSF");

    let response = server
        .put(&format!("/api/admin/levels/{}", level))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&admin_token),
        )
        .json(&serde_json::json!({ "name_fr": "Tronc Commun", "position": 1 }))
        .await;
    response.assert_status_ok();

    let response = server
        .put(&format!("/api/admin/classes/{}", class))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&admin_token),
        )
        .json(&serde_json::json!({ "level_code": level, "name": "TC Sciences 1" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["level_code"], level);

    // Deleting the level cascades to its classes.
    let response = server
        .delete(&format!("/api/admin/levels/{}", level))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&admin_token),
        )
        .await;
    response.assert_status_ok();

    let response = server
        .get("/api/admin/classes")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&admin_token),
        )
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let still_there = body
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["code"] == class);
    assert!(!still_there);

    ctx.cleanup_user(admin_id).await;
}

/// Test vocabulary management is admin only, even for teachers.
#[tokio::test]
#[ignore = "requires database"]
async fn test_vocabulary_requires_admin() {
    let ctx = TestContext::new_without_storage().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (teacher_id, teacher_token) = ctx
        .create_account("Test Teacher", "teacher", None, None, None)
        .await;

    let response = server
        .put("/api/admin/levels/2BAC")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&teacher_token),
        )
        .json(&serde_json::json!({ "name_fr": "Deuxième année bac" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);

    ctx.cleanup_user(teacher_id).await;
}
