//! Admin account management, the verification-code reset flow, and the
//! admin notification feed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use fableloom_core::error::CoreError;
use fableloom_core::roles::ROLE_ADMIN;
use fableloom_core::types::DbId;
use fableloom_db::models::notification::{Notification, NotificationWithContext};
use fableloom_db::models::user::{CreateUser, User, UserResponse};
use fableloom_db::repositories::{NotificationRepo, UserRepo};
use serde::Deserialize;

use crate::auth::password::{generate_verification_code, hash_password, hash_token};
use crate::error::{AppError, AppResult};
use crate::handlers::user::RESET_TOKEN_TTL_MINS;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /user/admin/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct AdminForgotPasswordRequest {
    pub email: String,
}

/// Request body for `POST /user/verify-code`.
#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

/// Request body for `POST /user/admin/set-new-password`.
#[derive(Debug, Deserialize)]
pub struct SetNewPasswordRequest {
    pub email: String,
    pub new_password: String,
}

/// Request body for `POST /user/make-admin`.
#[derive(Debug, Deserialize)]
pub struct MakeAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Verification-code reset flow
// ---------------------------------------------------------------------------

/// POST /api/user/admin/forgot-password
///
/// Email a 6-digit verification code to an admin account. Only the code's
/// hash is stored, with a 10-minute expiry.
pub async fn send_verification_code(
    State(state): State<AppState>,
    Json(input): Json<AdminForgotPasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let admin = find_admin_by_email(&state, &input.email).await?;

    let (code, code_hash) = generate_verification_code();
    let expires = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINS);
    UserRepo::set_password_reset(&state.pool, admin.id, &code_hash, expires).await?;

    state
        .mailer
        .send(
            &admin.email,
            "Password Reset Code",
            &format!("Your password reset code is {code}"),
        )
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to send email: {e}")))?;

    Ok(Json(
        serde_json::json!({ "message": "Verification code sent to email" }),
    ))
}

/// POST /api/user/verify-code
///
/// Check a verification code against its stored hash and expiry window.
pub async fn verify_code(
    State(state): State<AppState>,
    Json(input): Json<VerifyCodeRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if input.email.is_empty() || input.code.is_empty() {
        return Err(AppError::BadRequest(
            "Email and verification code are required".into(),
        ));
    }

    let admin = find_admin_by_email(&state, &input.email).await?;

    let expired = admin
        .password_reset_expires
        .is_none_or(|expires| expires < Utc::now());
    if expired {
        return Err(AppError::BadRequest(
            "Verification code has expired".into(),
        ));
    }

    if admin.password_reset_token_hash.as_deref() != Some(hash_token(&input.code).as_str()) {
        return Err(AppError::BadRequest("Invalid verification code".into()));
    }

    Ok(Json(
        serde_json::json!({ "message": "Code verified successfully" }),
    ))
}

/// POST /api/user/admin/set-new-password
///
/// Set a new password for an admin after code verification; clears the
/// stored code.
pub async fn set_new_password(
    State(state): State<AppState>,
    Json(input): Json<SetNewPasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let admin = find_admin_by_email(&state, &input.email).await?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::reset_password(&state.pool, admin.id, &password_hash).await?;

    Ok(Json(
        serde_json::json!({ "message": "Password updated successfully" }),
    ))
}

// ---------------------------------------------------------------------------
// Admin management
// ---------------------------------------------------------------------------

/// POST /api/user/make-admin
///
/// Promote an existing account to admin, or create a fresh admin account.
pub async fn make_admin(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<MakeAdminRequest>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() || input.email.is_empty() || input.password.is_empty() {
        return Err(AppError::BadRequest(
            "All fields (name, email, password) are required".into(),
        ));
    }

    let mut parts = input.name.trim().splitn(2, ' ');
    let first_name = parts.next().unwrap_or_default().to_string();
    let last_name = parts.next().unwrap_or_default().to_string();

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    match UserRepo::find_by_email(&state.pool, &input.email).await? {
        Some(existing) => {
            let promoted = UserRepo::promote_to_admin(
                &state.pool,
                existing.id,
                &first_name,
                &last_name,
                &password_hash,
            )
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: existing.id,
            }))?;

            tracing::info!(user_id = promoted.id, "User promoted to admin");

            Ok((
                StatusCode::OK,
                Json(DataResponse {
                    data: UserResponse::from(promoted),
                }),
            ))
        }
        None => {
            let created = UserRepo::create(
                &state.pool,
                &CreateUser {
                    first_name,
                    last_name,
                    email: input.email.clone(),
                    password_hash,
                    mobile: "N/A".to_string(),
                    location: None,
                    gender: "Not specified".to_string(),
                    date_of_birth: None,
                    profile_picture: String::new(),
                    role: ROLE_ADMIN.to_string(),
                },
            )
            .await?;

            tracing::info!(user_id = created.id, "New admin created");

            Ok((
                StatusCode::CREATED,
                Json(DataResponse {
                    data: UserResponse::from(created),
                }),
            ))
        }
    }
}

/// GET /api/user/get-all-admins
pub async fn get_all_admins(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let admins = UserRepo::list_admins(&state.pool).await?;
    Ok(Json(DataResponse {
        data: admins.into_iter().map(UserResponse::from).collect(),
    }))
}

/// DELETE /api/user/delete-admin/{id}
pub async fn delete_admin(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(admin_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let target = UserRepo::find_by_id(&state.pool, admin_id).await?;
    let is_admin = target.as_ref().is_some_and(|u| u.role == ROLE_ADMIN);
    if !is_admin {
        return Err(AppError::Core(CoreError::NotFoundMessage(
            "Admin not found or invalid admin ID".into(),
        )));
    }

    UserRepo::delete(&state.pool, admin_id).await?;

    Ok(Json(
        serde_json::json!({ "message": "Admin deleted successfully" }),
    ))
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// GET /api/admin/notifications
///
/// The admin notification feed, newest first, with user and order context.
pub async fn list_notifications(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<NotificationWithContext>>>> {
    let notifications = NotificationRepo::list_with_context(&state.pool).await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// PUT /api/admin/notifications/{id}/read
pub async fn mark_notification_read(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Notification>>> {
    let notification = NotificationRepo::mark_read(&state.pool, notification_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }))?;

    Ok(Json(DataResponse { data: notification }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Find an account by email and require the admin role, as 404.
async fn find_admin_by_email(state: &AppState, email: &str) -> AppResult<User> {
    UserRepo::find_by_email(&state.pool, email)
        .await?
        .filter(|u| u.role == ROLE_ADMIN)
        .ok_or_else(|| AppError::Core(CoreError::NotFoundMessage("Admin not found".into())))
}
