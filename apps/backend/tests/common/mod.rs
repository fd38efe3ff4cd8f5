//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up a test environment with a database
//! - Helper functions for creating accounts and seeding vocabulary codes
//! - Authentication helpers
//!
//! # Requirements
//! Integration tests require:
//! - PostgreSQL database (set DATABASE_URL env var)
//! - Optionally S3/R2 for storage tests (set S3_* env vars)

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use madrasati_backend::db::Database;
use madrasati_backend::models::UpsertSubjectRequest;
use madrasati_backend::services::storage::StorageService;
use madrasati_backend::{router, AppState};

/// Test context containing the database connection and the app router.
///
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set, the database connection fails, or
    /// the S3_* env vars are missing.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let storage = StorageService::from_env()
            .await
            .expect("Failed to initialize storage (set S3_* env vars)");

        Self::with_storage(storage).await
    }

    /// Create a new test context with placeholder storage credentials.
    ///
    /// Use this for tests that don't exercise object storage. Resource
    /// uploads will fail against the placeholder endpoint.
    pub async fn new_without_storage() -> Self {
        dotenvy::dotenv().ok();

        std::env::set_var("S3_BUCKET", "test-bucket");
        std::env::set_var("S3_ACCESS_KEY", "test-key");
        std::env::set_var("S3_SECRET_KEY", "test-secret");
        std::env::set_var("S3_ENDPOINT", "http://localhost:9000");

        let storage = StorageService::from_env()
            .await
            .expect("Failed to create storage config");

        Self::with_storage(storage).await
    }

    async fn with_storage(storage: StorageService) -> Self {
        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations().await.expect("Failed to run migrations");

        let db = Arc::new(db);

        let state = AppState {
            db: db.clone(),
            storage: Arc::new(storage),
        };

        let app = router(state);

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create an account and return its id and bearer token.
    pub async fn create_account(
        &self,
        full_name: &str,
        role: &str,
        level: Option<&str>,
        branch: Option<&str>,
        class_code: Option<&str>,
    ) -> (Uuid, String) {
        let user = self
            .db
            .create_user(full_name, role, "fr", level, branch, class_code)
            .await
            .expect("Failed to create test account");
        (user.id, user.token)
    }

    /// Create a student with the given profile codes.
    pub async fn create_student(
        &self,
        level: Option<&str>,
        branch: Option<&str>,
        class_code: Option<&str>,
    ) -> (Uuid, String) {
        self.create_account("Test Student", "student", level, branch, class_code)
            .await
    }

    /// Create an admin account.
    pub async fn create_admin(&self) -> (Uuid, String) {
        self.create_account("Test Admin", "admin", None, None, None)
            .await
    }

    /// Seed a subject code for course creation.
    pub async fn seed_subject(&self, code: &str) {
        self.db
            .upsert_subject(
                code,
                &UpsertSubjectRequest {
                    name_fr: format!("Subject {}", code),
                    name_ar: String::new(),
                },
            )
            .await
            .expect("Failed to seed subject");
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Remove a course and everything hanging off it.
    pub async fn cleanup_course(&self, course_id: Uuid) {
        let _ = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(self.db.pool())
            .await;
    }

    /// Remove a seeded subject.
    pub async fn cleanup_subject(&self, code: &str) {
        let _ = sqlx::query("DELETE FROM subjects WHERE code = $1")
            .bind(code)
            .execute(self.db.pool())
            .await;
    }

    /// Remove an account, dropping any courses it still teaches first.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        let _ = sqlx::query("DELETE FROM courses WHERE teacher_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}
