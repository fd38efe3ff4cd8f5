//! Certificate endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::enrollments::course_progress_for;
use crate::services::certificate;
use crate::services::storage::StorageService;
use crate::AppState;

/// POST /api/certificates/issue
/// Requires enrollment and a fully completed course. Idempotent per
/// (student, course).
pub async fn issue(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<IssueCertificateRequest>,
) -> Result<Json<CertificateView>> {
    let course = state
        .db
        .get_course(request.course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if !state.db.is_enrolled(auth.user_id, course.id).await? {
        return Err(ApiError::BadRequest(
            "Not enrolled in this course".to_string(),
        ));
    }

    if let Some(existing) = state.db.get_certificate_for(auth.user_id, course.id).await? {
        return Ok(Json(existing.to_api_certificate()));
    }

    let progress = course_progress_for(&state, auth.user_id, course.id).await?;
    if !progress.is_complete() {
        return Err(ApiError::BadRequest("Course is not complete".to_string()));
    }

    let student = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    let issued_at = Utc::now();
    let serial = certificate::certificate_serial(auth.user_id, course.id, issued_at);

    let cert = DbCertificate {
        id: Uuid::new_v4(),
        serial: serial.clone(),
        student_id: auth.user_id,
        course_id: course.id,
        issued_at,
    };
    state.db.insert_certificate(&cert).await?;

    // The row is the source of truth; the snapshot in object storage is a
    // best-effort copy for out-of-band verification.
    let document = certificate::snapshot_document(
        &serial,
        &student.full_name,
        course.title().resolve(student.locale()),
        issued_at,
    );
    if let Err(e) = state
        .storage
        .put_text(
            &StorageService::certificate_key(&serial),
            &document,
            Some("application/json"),
        )
        .await
    {
        tracing::warn!("Failed to store certificate snapshot {}: {}", serial, e);
    }

    tracing::info!("Issued certificate {} for course {}", serial, course.id);

    Ok(Json(cert.to_api_certificate()))
}

/// GET /api/certificates
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<CertificateListResponse>> {
    let certificates = state.db.list_certificates(auth.user_id).await?;

    Ok(Json(CertificateListResponse {
        certificates: certificates
            .iter()
            .map(|cert| cert.to_api_certificate())
            .collect(),
    }))
}

/// GET /api/certificates/verify/{serial}
/// Public endpoint: an unknown serial is a negative answer, not an error
pub async fn verify(
    State(state): State<AppState>,
    Path(serial): Path<String>,
) -> Result<Json<VerifyCertificateResponse>> {
    let Some(cert) = state.db.get_certificate_by_serial(&serial).await? else {
        return Ok(Json(VerifyCertificateResponse {
            valid: false,
            serial,
            student_name: None,
            course_title: None,
            issued_at: None,
        }));
    };

    let student_name = state
        .db
        .get_user(cert.student_id)
        .await?
        .map(|user| user.full_name);
    let course_title = state
        .db
        .get_course(cert.course_id)
        .await?
        .map(|course| course.title().resolve(Locale::Fr).to_string());

    Ok(Json(VerifyCertificateResponse {
        valid: true,
        serial: cert.serial,
        student_name,
        course_title,
        issued_at: Some(cert.issued_at),
    }))
}
