//! Exercise endpoints

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
use crate::AppState;

/// Solutions unlock for staff, or once the student has a passing quiz
/// attempt somewhere in the course.
async fn solution_unlocked(
    state: &AppState,
    auth: &AuthenticatedUser,
    course_id: Uuid,
) -> Result<bool> {
    if auth.is_staff() {
        return Ok(true);
    }
    Ok(state.db.count_passed_quizzes(auth.user_id, course_id).await? > 0)
}

/// GET /api/courses/{id}/exercises
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ExerciseListResponse>> {
    let course = fetch_visible_course(&state, &auth, course_id).await?;

    let exercises = state.db.list_exercises(course.id).await?;
    let with_solution = solution_unlocked(&state, &auth, course.id).await?;

    let exercises = exercises
        .iter()
        .filter(|exercise| auth.is_staff() || exercise.audience().allows(&auth.profile))
        .map(|exercise| exercise.to_api_exercise(auth.locale, with_solution))
        .collect();

    Ok(Json(ExerciseListResponse { exercises }))
}

/// GET /api/exercises/{id}
pub async fn detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(exercise_id): Path<Uuid>,
) -> Result<Json<ExerciseView>> {
    let exercise = state
        .db
        .get_exercise(exercise_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Exercise not found".to_string()))?;

    let course = fetch_visible_course(&state, &auth, exercise.course_id).await?;

    if !auth.is_staff() && !exercise.audience().allows(&auth.profile) {
        return Err(ApiError::NotFound("Exercise not found".to_string()));
    }

    let with_solution = solution_unlocked(&state, &auth, course.id).await?;

    Ok(Json(exercise.to_api_exercise(auth.locale, with_solution)))
}

/// POST /api/courses/{id}/exercises
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
    Json(request): Json<CreateExerciseRequest>,
) -> Result<Json<ExerciseView>> {
    require_staff(&auth)?;

    state
        .db
        .get_course(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let exercise = DbExercise {
        id: Uuid::new_v4(),
        course_id,
        title_fr: request.title_fr,
        title_ar: request.title_ar,
        statement_fr: request.statement_fr,
        statement_ar: request.statement_ar,
        solution_fr: request.solution_fr,
        solution_ar: request.solution_ar,
        target_levels: request.target_levels,
        target_branches: request.target_branches,
        target_classes: request.target_classes,
        created_at: Utc::now(),
    };
    state.db.insert_exercise(&exercise).await?;

    Ok(Json(exercise.to_api_exercise(auth.locale, true)))
}

/// PUT /api/exercises/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(exercise_id): Path<Uuid>,
    Json(request): Json<UpdateExerciseRequest>,
) -> Result<Json<ExerciseView>> {
    require_staff(&auth)?;

    let mut current = state
        .db
        .get_exercise(exercise_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Exercise not found".to_string()))?;

    if let Some(title_fr) = request.title_fr {
        current.title_fr = title_fr;
    }
    if let Some(title_ar) = request.title_ar {
        current.title_ar = title_ar;
    }
    if let Some(statement_fr) = request.statement_fr {
        current.statement_fr = statement_fr;
    }
    if let Some(statement_ar) = request.statement_ar {
        current.statement_ar = statement_ar;
    }
    if let Some(solution_fr) = request.solution_fr {
        current.solution_fr = solution_fr;
    }
    if let Some(solution_ar) = request.solution_ar {
        current.solution_ar = solution_ar;
    }
    if let Some(target_levels) = request.target_levels {
        current.target_levels = target_levels;
    }
    if let Some(target_branches) = request.target_branches {
        current.target_branches = target_branches;
    }
    if let Some(target_classes) = request.target_classes {
        current.target_classes = target_classes;
    }

    state.db.update_exercise(&current).await?;

    Ok(Json(current.to_api_exercise(auth.locale, true)))
}

/// DELETE /api/exercises/{id}
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(exercise_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    require_staff(&auth)?;

    let deleted = state.db.delete_exercise(exercise_id).await?;

    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
