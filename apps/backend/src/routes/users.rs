//! Account profile endpoints

use axum::{extract::State, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::{Locale, UpdateProfileRequest, UserView};
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<UserView>> {
    let user = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    Ok(Json(user.to_api_user()))
}

/// PUT /api/me/profile
/// Provided fields replace the stored values, absent fields are kept
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserView>> {
    let current = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    let locale = match request.locale {
        Some(l) => Locale::from_str(&l)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown locale: {}", l)))?
            .as_str()
            .to_string(),
        None => current.locale.clone(),
    };
    let level = request.level.or(current.level);
    let branch = request.branch.or(current.branch);
    let class_code = request.class_code.or(current.class_code);

    let updated = state
        .db
        .update_user_profile(
            auth.user_id,
            &locale,
            level.as_deref(),
            branch.as_deref(),
            class_code.as_deref(),
        )
        .await?;

    Ok(Json(updated.to_api_user()))
}
