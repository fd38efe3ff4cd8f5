//! Authentication middleware and account endpoints

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{
    Locale, LoginRequest, RegisterRequest, RegisterResponse, Role, StudentProfile, UserView,
};
use crate::AppState;

/// Authenticated account info stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: Role,
    pub locale: Locale,
    pub profile: StudentProfile,
}

impl AuthenticatedUser {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

/// Require a teacher or admin caller
pub fn require_staff(auth: &AuthenticatedUser) -> Result<()> {
    if auth.role.is_staff() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "teacher or admin role required".to_string(),
        ))
    }
}

/// Require an admin caller
pub fn require_admin(auth: &AuthenticatedUser) -> Result<()> {
    if auth.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden("admin role required".to_string()))
    }
}

/// Auth middleware - extracts the bearer token from the Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    // Skip auth for the public endpoints
    let path = request.uri().path();
    if path == "/health"
        || path.starts_with("/api/auth/")
        || path.starts_with("/api/certificates/verify/")
    {
        return Ok(next.run(request).await);
    }

    // Extract Bearer token
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?
        .to_string();

    // Look up account by token
    let user = state
        .db
        .get_user_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))?;

    // Update last_seen
    state.db.update_last_seen(user.id).await?;

    // Store authenticated account in request extensions
    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        role: user.role(),
        locale: user.locale(),
        profile: user.profile(),
    });

    Ok(next.run(request).await)
}

/// POST /api/auth/register
/// Creates an account and returns its bearer token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    if payload.full_name.trim().is_empty() {
        return Err(ApiError::BadRequest("full_name is required".to_string()));
    }

    let role = match payload.role.as_deref() {
        None => Role::Student,
        Some(r) => Role::from_str(r)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown role: {}", r)))?,
    };

    let locale = match payload.locale.as_deref() {
        None => Locale::Fr,
        Some(l) => Locale::from_str(l)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown locale: {}", l)))?,
    };

    let user = state
        .db
        .create_user(
            payload.full_name.trim(),
            role.as_str(),
            locale.as_str(),
            payload.level.as_deref(),
            payload.branch.as_deref(),
            payload.class_code.as_deref(),
        )
        .await?;

    tracing::info!("Registered account {} ({})", user.id, user.role);

    Ok(Json(RegisterResponse {
        user_id: user.id,
        token: user.token,
    }))
}

/// POST /api/auth/login
/// Exchanges a stored token for the account it belongs to
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<UserView>> {
    let user = state
        .db
        .get_user_by_token(&payload.token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))?;

    state.db.update_last_seen(user.id).await?;

    Ok(Json(user.to_api_user()))
}
