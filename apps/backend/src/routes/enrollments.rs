//! Enrollment and progress endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::courses::fetch_visible_course;
use crate::AppState;

/// POST /api/courses/{id}/enroll
/// Enrolling twice is a no-op returning the existing enrollment
pub async fn enroll(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let course = fetch_visible_course(&state, &auth, course_id).await?;

    let enrollment = state.db.enroll(auth.user_id, course.id).await?;

    tracing::info!("Student {} enrolled in course {}", auth.user_id, course.id);

    Ok(Json(serde_json::json!({
        "enrollment_id": enrollment.id,
        "course_id": enrollment.course_id,
        "enrolled_at": enrollment.enrolled_at,
    })))
}

/// DELETE /api/courses/{id}/enroll
pub async fn unenroll(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let removed = state.db.unenroll(auth.user_id, course_id).await?;

    Ok(Json(serde_json::json!({ "removed": removed })))
}

/// GET /api/enrollments
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<EnrollmentListResponse>> {
    let enrollments = state.db.list_enrollments(auth.user_id).await?;

    let mut views = Vec::with_capacity(enrollments.len());
    for enrollment in enrollments {
        if let Some(course) = state.db.get_course(enrollment.course_id).await? {
            views.push(EnrollmentView {
                course: course.to_summary(auth.locale),
                enrolled_at: enrollment.enrolled_at,
            });
        }
    }

    Ok(Json(EnrollmentListResponse { enrollments: views }))
}

/// GET /api/courses/{id}/progress
pub async fn progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ProgressResponse>> {
    let course = fetch_visible_course(&state, &auth, course_id).await?;

    let progress = course_progress_for(&state, auth.user_id, course.id).await?;
    let certificate_issued = state
        .db
        .get_certificate_for(auth.user_id, course.id)
        .await?
        .is_some();

    Ok(Json(ProgressResponse {
        course_id: course.id,
        progress,
        certificate_issued,
    }))
}

/// Progress over course units: lessons read plus quizzes with a passing
/// attempt. Also gates certificate issuance.
pub(crate) async fn course_progress_for(
    state: &AppState,
    student_id: Uuid,
    course_id: Uuid,
) -> Result<CourseProgress> {
    let lessons_total = state.db.count_lessons(course_id).await? as usize;
    let lessons_completed = state
        .db
        .count_completed_lessons(student_id, course_id)
        .await? as usize;
    let quizzes_total = state.db.count_quizzes(course_id).await? as usize;
    let quizzes_passed = state
        .db
        .count_passed_quizzes(student_id, course_id)
        .await? as usize;

    Ok(CourseProgress::compute(
        lessons_completed,
        lessons_total,
        quizzes_passed,
        quizzes_total,
    ))
}
