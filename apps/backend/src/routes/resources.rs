//! Course resource endpoints (uploaded documents in object storage)

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::{require_staff, AuthenticatedUser};
use crate::routes::courses::fetch_visible_course;
use crate::services::storage::{self, StorageService};
use crate::AppState;

/// POST /api/courses/{id}/resources
/// Uploads a text document and tracks it against its object key
pub async fn upload(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
    Json(request): Json<UploadResourceRequest>,
) -> Result<Json<ResourceView>> {
    require_staff(&auth)?;

    state
        .db
        .get_course(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let file_name = request.file_name.trim();
    if file_name.is_empty() {
        return Err(ApiError::BadRequest("file_name is required".to_string()));
    }

    let key = StorageService::resource_key(course_id, file_name);
    state
        .storage
        .put_text(&key, &request.content, request.content_type.as_deref())
        .await?;

    let resource = DbResource {
        id: Uuid::new_v4(),
        course_id,
        file_name: file_name.to_string(),
        content_type: request.content_type,
        s3_key: key,
        content_hash: storage::content_hash(&request.content),
        uploaded_by: auth.user_id,
        uploaded_at: Utc::now(),
    };
    let resource = state.db.insert_resource(&resource).await?;

    Ok(Json(resource.to_api_resource()))
}

/// GET /api/courses/{id}/resources
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ResourceListResponse>> {
    let course = fetch_visible_course(&state, &auth, course_id).await?;

    let resources = state.db.list_resources(course.id).await?;

    Ok(Json(ResourceListResponse {
        resources: resources
            .iter()
            .map(|resource| resource.to_api_resource())
            .collect(),
    }))
}

/// GET /api/resources/{id}/download
pub async fn download(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(resource_id): Path<Uuid>,
) -> Result<Json<ResourceDownloadResponse>> {
    let resource = state
        .db
        .get_resource(resource_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Resource not found".to_string()))?;

    fetch_visible_course(&state, &auth, resource.course_id).await?;

    let content = state.storage.get_text(&resource.s3_key).await?;

    Ok(Json(ResourceDownloadResponse {
        file_name: resource.file_name,
        content_type: resource.content_type,
        content,
    }))
}
