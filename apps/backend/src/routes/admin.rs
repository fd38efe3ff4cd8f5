//! Academic structure endpoints (admin vocabulary management)
//!
//! Levels, branches, classes and subjects form the fixed code vocabulary
//! that audience tags and student profiles draw from.

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::{require_admin, AuthenticatedUser};
use crate::AppState;

// === Levels ===

/// GET /api/admin/levels
pub async fn list_levels(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<DbLevel>>> {
    require_admin(&auth)?;
    Ok(Json(state.db.list_levels().await?))
}

/// PUT /api/admin/levels/{code}
pub async fn upsert_level(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(code): Path<String>,
    Json(request): Json<UpsertLevelRequest>,
) -> Result<Json<DbLevel>> {
    require_admin(&auth)?;
    let level = state.db.upsert_level(&code, &request).await?;
    Ok(Json(level))
}

/// DELETE /api/admin/levels/{code}
pub async fn delete_level(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(code): Path<String>,
) -> Result<Json<serde_json::Value>> {
    require_admin(&auth)?;
    let deleted = state.db.delete_level(&code).await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

// === Branches ===

/// GET /api/admin/branches
pub async fn list_branches(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<DbBranch>>> {
    require_admin(&auth)?;
    Ok(Json(state.db.list_branches().await?))
}

/// PUT /api/admin/branches/{code}
pub async fn upsert_branch(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(code): Path<String>,
    Json(request): Json<UpsertBranchRequest>,
) -> Result<Json<DbBranch>> {
    require_admin(&auth)?;
    let branch = state.db.upsert_branch(&code, &request).await?;
    Ok(Json(branch))
}

/// DELETE /api/admin/branches/{code}
pub async fn delete_branch(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(code): Path<String>,
) -> Result<Json<serde_json::Value>> {
    require_admin(&auth)?;
    let deleted = state.db.delete_branch(&code).await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

// === Classes ===

/// GET /api/admin/classes
pub async fn list_classes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<DbSchoolClass>>> {
    require_admin(&auth)?;
    Ok(Json(state.db.list_classes().await?))
}

/// PUT /api/admin/classes/{code}
pub async fn upsert_class(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(code): Path<String>,
    Json(request): Json<UpsertClassRequest>,
) -> Result<Json<DbSchoolClass>> {
    require_admin(&auth)?;
    let class = state.db.upsert_class(&code, &request).await?;
    Ok(Json(class))
}

/// DELETE /api/admin/classes/{code}
pub async fn delete_class(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(code): Path<String>,
) -> Result<Json<serde_json::Value>> {
    require_admin(&auth)?;
    let deleted = state.db.delete_class(&code).await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

// === Subjects ===

/// GET /api/admin/subjects
pub async fn list_subjects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<DbSubject>>> {
    require_admin(&auth)?;
    Ok(Json(state.db.list_subjects().await?))
}

/// PUT /api/admin/subjects/{code}
pub async fn upsert_subject(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(code): Path<String>,
    Json(request): Json<UpsertSubjectRequest>,
) -> Result<Json<DbSubject>> {
    require_admin(&auth)?;
    let subject = state.db.upsert_subject(&code, &request).await?;
    Ok(Json(subject))
}

/// DELETE /api/admin/subjects/{code}
pub async fn delete_subject(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(code): Path<String>,
) -> Result<Json<serde_json::Value>> {
    require_admin(&auth)?;
    let deleted = state.db.delete_subject(&code).await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
