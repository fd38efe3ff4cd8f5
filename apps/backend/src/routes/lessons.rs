//! Lesson endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::{require_staff, AuthenticatedUser};
use crate::routes::courses::fetch_visible_course;
use crate::AppState;

/// POST /api/courses/{id}/lessons
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
    Json(request): Json<CreateLessonRequest>,
) -> Result<Json<LessonView>> {
    require_staff(&auth)?;

    state
        .db
        .get_course(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let lesson = DbLesson {
        id: Uuid::new_v4(),
        course_id,
        position: request.position,
        title_fr: request.title_fr,
        title_ar: request.title_ar,
        body_fr: request.body_fr,
        body_ar: request.body_ar,
    };
    state.db.insert_lesson(&lesson).await?;

    Ok(Json(lesson.to_api_lesson(auth.locale)))
}

/// PUT /api/lessons/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(lesson_id): Path<Uuid>,
    Json(request): Json<UpdateLessonRequest>,
) -> Result<Json<LessonView>> {
    require_staff(&auth)?;

    let mut current = state
        .db
        .get_lesson(lesson_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    if let Some(position) = request.position {
        current.position = position;
    }
    if let Some(title_fr) = request.title_fr {
        current.title_fr = title_fr;
    }
    if let Some(title_ar) = request.title_ar {
        current.title_ar = title_ar;
    }
    if let Some(body_fr) = request.body_fr {
        current.body_fr = body_fr;
    }
    if let Some(body_ar) = request.body_ar {
        current.body_ar = body_ar;
    }

    state.db.update_lesson(&current).await?;

    Ok(Json(current.to_api_lesson(auth.locale)))
}

/// DELETE /api/lessons/{id}
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    require_staff(&auth)?;

    let deleted = state.db.delete_lesson(lesson_id).await?;

    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

/// POST /api/lessons/{id}/complete
/// Marks the lesson read for the calling student
pub async fn complete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let lesson = state
        .db
        .get_lesson(lesson_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    let course = fetch_visible_course(&state, &auth, lesson.course_id).await?;

    if !state.db.is_enrolled(auth.user_id, course.id).await? {
        return Err(ApiError::BadRequest(
            "Not enrolled in this course".to_string(),
        ));
    }

    state.db.mark_lesson_complete(auth.user_id, lesson.id).await?;

    Ok(Json(serde_json::json!({ "completed": true })))
}
