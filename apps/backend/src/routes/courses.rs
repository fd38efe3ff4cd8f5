//! Course catalog and management endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::{require_staff, AuthenticatedUser};
use crate::AppState;

/// Fetch a course, hiding it (404) from callers outside its audience.
/// Staff see everything, drafts included.
pub(crate) async fn fetch_visible_course(
    state: &AppState,
    auth: &AuthenticatedUser,
    course_id: Uuid,
) -> Result<DbCourse> {
    let course = state
        .db
        .get_course(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if auth.is_staff() {
        return Ok(course);
    }

    if !course.published || !course.audience().allows(&auth.profile) {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    Ok(course)
}

/// GET /api/courses
/// The catalog a student browses. Audience filtering runs here, over the
/// fetched list, never in the query.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<CourseListResponse>> {
    let courses = if auth.is_staff() {
        state.db.list_all_courses().await?
    } else {
        state
            .db
            .list_published_courses()
            .await?
            .into_iter()
            .filter(|course| course.audience().allows(&auth.profile))
            .collect()
    };

    Ok(Json(CourseListResponse {
        courses: courses
            .iter()
            .map(|course| course.to_summary(auth.locale))
            .collect(),
    }))
}

/// GET /api/courses/{id}
pub async fn detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseDetailResponse>> {
    let course = fetch_visible_course(&state, &auth, course_id).await?;

    let lessons = state.db.list_lessons(course.id).await?;
    let quizzes = state.db.list_quizzes(course.id).await?;
    let exercises = state.db.list_exercises(course.id).await?;

    // Quizzes and exercises carry their own tags and are filtered item by item.
    let mut quiz_summaries = Vec::new();
    for quiz in quizzes
        .iter()
        .filter(|quiz| auth.is_staff() || quiz.audience().allows(&auth.profile))
    {
        let question_count = state.db.count_questions(quiz.id).await? as usize;
        quiz_summaries.push(QuizSummary {
            id: quiz.id,
            title: quiz.title().resolve(auth.locale).to_string(),
            question_count,
        });
    }

    let exercise_summaries = exercises
        .iter()
        .filter(|exercise| auth.is_staff() || exercise.audience().allows(&auth.profile))
        .map(|exercise| ExerciseSummary {
            id: exercise.id,
            title: LocalizedText::new(exercise.title_fr.clone(), exercise.title_ar.clone())
                .resolve(auth.locale)
                .to_string(),
        })
        .collect();

    Ok(Json(CourseDetailResponse {
        course: course.to_summary(auth.locale),
        lessons: lessons
            .iter()
            .map(|lesson| lesson.to_api_lesson(auth.locale))
            .collect(),
        quizzes: quiz_summaries,
        exercises: exercise_summaries,
    }))
}

/// POST /api/courses
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<CreateCourseRequest>,
) -> Result<Json<CourseSummary>> {
    require_staff(&auth)?;

    if request.title_fr.trim().is_empty() && request.title_ar.trim().is_empty() {
        return Err(ApiError::BadRequest("a course title is required".to_string()));
    }

    state
        .db
        .get_subject(&request.subject_code)
        .await?
        .ok_or_else(|| {
            ApiError::BadRequest(format!("Unknown subject: {}", request.subject_code))
        })?;

    let now = Utc::now();
    let course = DbCourse {
        id: Uuid::new_v4(),
        subject_code: request.subject_code,
        teacher_id: auth.user_id,
        title_fr: request.title_fr,
        title_ar: request.title_ar,
        summary_fr: request.summary_fr,
        summary_ar: request.summary_ar,
        target_levels: request.target_levels,
        target_branches: request.target_branches,
        target_classes: request.target_classes,
        published: request.published,
        created_at: now,
        updated_at: now,
    };
    state.db.insert_course(&course).await?;

    tracing::info!("Created course {}", course.id);

    Ok(Json(course.to_summary(auth.locale)))
}

/// PUT /api/courses/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
    Json(request): Json<UpdateCourseRequest>,
) -> Result<Json<CourseSummary>> {
    require_staff(&auth)?;

    let mut current = state
        .db
        .get_course(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if let Some(subject_code) = request.subject_code {
        state.db.get_subject(&subject_code).await?.ok_or_else(|| {
            ApiError::BadRequest(format!("Unknown subject: {}", subject_code))
        })?;
        current.subject_code = subject_code;
    }
    if let Some(title_fr) = request.title_fr {
        current.title_fr = title_fr;
    }
    if let Some(title_ar) = request.title_ar {
        current.title_ar = title_ar;
    }
    if let Some(summary_fr) = request.summary_fr {
        current.summary_fr = summary_fr;
    }
    if let Some(summary_ar) = request.summary_ar {
        current.summary_ar = summary_ar;
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
    if let Some(published) = request.published {
        current.published = published;
    }

    state.db.update_course(&current).await?;

    Ok(Json(current.to_summary(auth.locale)))
}

/// DELETE /api/courses/{id}
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    require_staff(&auth)?;

    let deleted = state.db.delete_course(course_id).await?;

    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
