pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;
use crate::services::storage::StorageService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub storage: Arc<StorageService>,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Account routes
        .route("/api/me", get(routes::users::me))
        .route("/api/me/profile", put(routes::users::update_profile))
        // Course routes
        .route("/api/courses", get(routes::courses::list))
        .route("/api/courses", post(routes::courses::create))
        .route("/api/courses/{id}", get(routes::courses::detail))
        .route("/api/courses/{id}", put(routes::courses::update))
        .route("/api/courses/{id}", delete(routes::courses::remove))
        // Enrollment routes
        .route("/api/courses/{id}/enroll", post(routes::enrollments::enroll))
        .route("/api/courses/{id}/enroll", delete(routes::enrollments::unenroll))
        .route("/api/courses/{id}/progress", get(routes::enrollments::progress))
        .route("/api/enrollments", get(routes::enrollments::list))
        // Lesson routes
        .route("/api/courses/{id}/lessons", post(routes::lessons::create))
        .route("/api/lessons/{id}", put(routes::lessons::update))
        .route("/api/lessons/{id}", delete(routes::lessons::remove))
        .route("/api/lessons/{id}/complete", post(routes::lessons::complete))
        // Quiz routes
        .route("/api/courses/{id}/quizzes", post(routes::quizzes::create))
        .route("/api/quizzes/{id}", get(routes::quizzes::detail))
        .route("/api/quizzes/{id}", put(routes::quizzes::update))
        .route("/api/quizzes/{id}", delete(routes::quizzes::remove))
        .route("/api/quizzes/{id}/questions", post(routes::quizzes::add_question))
        .route("/api/questions/{id}", put(routes::quizzes::update_question))
        .route("/api/questions/{id}", delete(routes::quizzes::remove_question))
        .route("/api/quizzes/{id}/attempts", post(routes::quizzes::submit_attempt))
        .route("/api/quizzes/{id}/attempts", get(routes::quizzes::list_attempts))
        // Exercise routes
        .route("/api/courses/{id}/exercises", get(routes::exercises::list))
        .route("/api/courses/{id}/exercises", post(routes::exercises::create))
        .route("/api/exercises/{id}", get(routes::exercises::detail))
        .route("/api/exercises/{id}", put(routes::exercises::update))
        .route("/api/exercises/{id}", delete(routes::exercises::remove))
        // Certificate routes
        .route("/api/certificates", get(routes::certificates::list))
        .route("/api/certificates/issue", post(routes::certificates::issue))
        // Resource routes
        .route("/api/courses/{id}/resources", get(routes::resources::list))
        .route("/api/courses/{id}/resources", post(routes::resources::upload))
        .route("/api/resources/{id}/download", get(routes::resources::download))
        // Academic structure routes
        .route("/api/admin/levels", get(routes::admin::list_levels))
        .route("/api/admin/levels/{code}", put(routes::admin::upsert_level))
        .route("/api/admin/levels/{code}", delete(routes::admin::delete_level))
        .route("/api/admin/branches", get(routes::admin::list_branches))
        .route("/api/admin/branches/{code}", put(routes::admin::upsert_branch))
        .route("/api/admin/branches/{code}", delete(routes::admin::delete_branch))
        .route("/api/admin/classes", get(routes::admin::list_classes))
        .route("/api/admin/classes/{code}", put(routes::admin::upsert_class))
        .route("/api/admin/classes/{code}", delete(routes::admin::delete_class))
        .route("/api/admin/subjects", get(routes::admin::list_subjects))
        .route("/api/admin/subjects/{code}", put(routes::admin::upsert_subject))
        .route("/api/admin/subjects/{code}", delete(routes::admin::delete_subject))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route(
            "/api/certificates/verify/{serial}",
            get(routes::certificates::verify),
        )
        .merge(protected_routes)
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    tracing::info!("Initializing object storage...");
    let storage = StorageService::from_env().await?;

    let state = AppState {
        db: Arc::new(db),
        storage: Arc::new(storage),
    };

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
