//! Enrollment and progress API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running.

mod common;

use axum_test::TestServer;
use uuid::Uuid;

use common::fixtures;
use common::TestContext;

struct CourseFixture {
    admin_id: Uuid,
    admin_token: String,
    subject: String,
    course_id: Uuid,
}

async fn seed_course(ctx: &TestContext, server: &TestServer) -> CourseFixture {
    let (admin_id, admin_token) = ctx.create_admin().await;
    let subject = fixtures::unique_code("GEO");
    ctx.seed_subject(&subject).await;

    let response = server
        .post("/api/courses")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&admin_token),
        )
        .json(&fixtures::course_request(&subject, "Géographie"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let course_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();

    CourseFixture {
        admin_id,
        admin_token,
        subject,
        course_id,
    }
}

async fn cleanup(ctx: &TestContext, fixture: CourseFixture, student_id: Uuid) {
    ctx.cleanup_course(fixture.course_id).await;
    ctx.cleanup_subject(&fixture.subject).await;
    ctx.cleanup_user(student_id).await;
    ctx.cleanup_user(fixture.admin_id).await;
}

/// Test enroll, list and unenroll round trip.
#[tokio::test]
#[ignore = "requires database"]
async fn test_enroll_list_unenroll() {
    let ctx = TestContext::new_without_storage().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let fixture = seed_course(&ctx, &server).await;
    let (student_id, student_token) = ctx.create_student(None, None, None).await;

    let response = server
        .post(&format!("/api/courses/{}/enroll", fixture.course_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&student_token),
        )
        .await;
    response.assert_status_ok();

    let response = server
        .get("/api/enrollments")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&student_token),
        )
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["enrollments"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["enrollments"][0]["course"]["id"],
        fixture.course_id.to_string()
    );

    let response = server
        .delete(&format!("/api/courses/{}/enroll", fixture.course_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&student_token),
        )
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["removed"], true);

    cleanup(&ctx, fixture, student_id).await;
}

/// Test enrolling twice returns the same enrollment.
#[tokio::test]
#[ignore = "requires database"]
async fn test_enroll_is_idempotent() {
    let ctx = TestContext::new_without_storage().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let fixture = seed_course(&ctx, &server).await;
    let (student_id, student_token) = ctx.create_student(None, None, None).await;

    let response = server
        .post(&format!("/api/courses/{}/enroll", fixture.course_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&student_token),
        )
        .await;
    response.assert_status_ok();
    let first: serde_json::Value = response.json();

    let response = server
        .post(&format!("/api/courses/{}/enroll", fixture.course_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&student_token),
        )
        .await;
    response.assert_status_ok();
    let second: serde_json::Value = response.json();

    assert_eq!(first["enrollment_id"], second["enrollment_id"]);

    cleanup(&ctx, fixture, student_id).await;
}

/// Test progress counts lessons read and quizzes passed.
#[tokio::test]
#[ignore = "requires database"]
async fn test_progress_tracks_lessons_and_quizzes() {
    let ctx = TestContext::new_without_storage().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let fixture = seed_course(&ctx, &server).await;

    // One lesson and one single-question quiz.
    let response = server
        .post(&format!("/api/courses/{}/lessons", fixture.course_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&fixture.admin_token),
        )
        .json(&fixtures::lesson_request("Chapitre 1"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let lesson_id = body["id"].as_str().unwrap().to_string();

    let response = server
        .post(&format!("/api/courses/{}/quizzes", fixture.course_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&fixture.admin_token),
        )
        .json(&fixtures::quiz_request("Contrôle"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let quiz_id = body["id"].as_str().unwrap().to_string();

    let response = server
        .post(&format!("/api/quizzes/{}/questions", quiz_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&fixture.admin_token),
        )
        .json(&fixtures::mcq_question_request("Question", &["a", "b"], 0, 1))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let question_id = body["id"].as_str().unwrap().to_string();

    let (student_id, student_token) = ctx.create_student(None, None, None).await;
    let response = server
        .post(&format!("/api/courses/{}/enroll", fixture.course_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&student_token),
        )
        .await;
    response.assert_status_ok();

    // Nothing done yet.
    let response = server
        .get(&format!("/api/courses/{}/progress", fixture.course_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&student_token),
        )
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["progress"]["percent"], 0.0);

    // Read the lesson: half the units.
    let response = server
        .post(&format!("/api/lessons/{}/complete", lesson_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&student_token),
        )
        .await;
    response.assert_status_ok();

    let response = server
        .get(&format!("/api/courses/{}/progress", fixture.course_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&student_token),
        )
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["progress"]["percent"], 50.0);
    assert_eq!(body["progress"]["lessons_completed"], 1);

    // Pass the quiz: everything done.
    let response = server
        .post(&format!("/api/quizzes/{}/attempts", quiz_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&student_token),
        )
        .json(&fixtures::choice_attempt_request(&question_id, 0))
        .await;
    response.assert_status_ok();

    let response = server
        .get(&format!("/api/courses/{}/progress", fixture.course_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&student_token),
        )
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["progress"]["percent"], 100.0);
    assert_eq!(body["progress"]["quizzes_passed"], 1);

    cleanup(&ctx, fixture, student_id).await;
}
