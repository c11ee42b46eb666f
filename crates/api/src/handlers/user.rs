//! Handlers for the `/user` resource: registration, login, refresh/logout,
//! password reset, and profile management.

use axum::extract::{Multipart, Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use fableloom_core::error::CoreError;
use fableloom_core::roles::{ROLE_ADMIN, ROLE_USER};
use fableloom_core::types::DbId;
use fableloom_db::models::user::{CreateUser, UpdateProfile, User, UserResponse};
use fableloom_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::cookies::{
    build_refresh_cookie, clear_refresh_cookie, cookie_value, REFRESH_COOKIE,
};
use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{generate_reset_token, hash_password, hash_token, verify_password};
use crate::error::{AppError, AppResult};
use crate::media::{self, MultipartForm, UploadKind, PROFILE_PICTURE_EDGE};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Lifetime of a password-reset token.
pub const RESET_TOKEN_TTL_MINS: i64 = 10;


// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Registration fields collected from the multipart form.
#[derive(Debug, Validate)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub mobile: String,
    pub location: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Request body for `POST /user/login` and `POST /user/admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /user/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body for `POST /user/reset-password/{token}` and
/// `PUT /user/update-password`.
#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    pub password: String,
}

/// Request body for `PUT /user/set-preferred-language`.
#[derive(Debug, Deserialize)]
pub struct PreferredLanguageRequest {
    pub preferred_language: String,
}

/// Successful authentication response; the refresh token travels only in
/// the HTTP-only cookie.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Registration and login
// ---------------------------------------------------------------------------

/// POST /api/user/register
///
/// Multipart registration with an optional `profile_picture` image, resized
/// to 200x200 before storage. Duplicate emails are rejected with 400.
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = MultipartForm::parse(multipart).await?;
    let input = register_request_from_form(&form)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("User already exists".into()));
    }

    let profile_picture = match form.file("profile_picture") {
        Some(file) => {
            media::store_upload(
                &state.config,
                file,
                UploadKind::Image,
                Some(PROFILE_PICTURE_EDGE),
            )
            .await?
        }
        None => String::new(),
    };

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            password_hash,
            mobile: input.mobile,
            location: input.location,
            gender: input.gender.unwrap_or_else(|| "Not specified".to_string()),
            date_of_birth: input.date_of_birth,
            profile_picture,
            role: ROLE_USER.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// POST /api/user/login
///
/// Email + password. Bad credentials are a 400 regardless of which half was
/// wrong. Success returns the access token and sets the refresh cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid credentials".into()))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    if user.is_blocked {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is blocked".into(),
        )));
    }

    issue_session(&state, user).await
}

/// POST /api/user/admin/login
///
/// Admin-only login: 404 for unknown emails, 403 for non-admin accounts,
/// 400 for a wrong password.
pub async fn admin_login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundMessage("Admin not found".into()))
        })?;

    if user.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not authorized as Admin".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    issue_session(&state, user).await
}

/// GET /api/user/refresh
///
/// Exchange the refresh cookie for a new access token.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let token = cookie_value(&headers, REFRESH_COOKIE).ok_or_else(|| {
        AppError::Core(CoreError::Forbidden("No refresh token provided".into()))
    })?;

    let user = UserRepo::find_by_refresh_token_hash(&state.pool, &hash_refresh_token(&token))
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Forbidden("Refresh token not valid".into())))?;

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(DataResponse {
        data: serde_json::json!({ "token": access_token }),
    }))
}

/// POST /api/user/logout
///
/// Clear the server-side refresh token and expire the cookie. 204.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    if let Some(token) = cookie_value(&headers, REFRESH_COOKIE) {
        UserRepo::clear_refresh_token_by_hash(&state.pool, &hash_refresh_token(&token)).await?;
    }

    Ok((
        AppendHeaders([(SET_COOKIE, clear_refresh_cookie())]),
        StatusCode::NO_CONTENT,
    ))
}

// ---------------------------------------------------------------------------
// Password reset and update
// ---------------------------------------------------------------------------

/// POST /api/user/forgot-password
///
/// Issue a time-boxed reset token and email a reset link. Only the token's
/// hash is stored.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFoundMessage("User not found".into())))?;

    let (token, token_hash) = generate_reset_token();
    let expires = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINS);
    UserRepo::set_password_reset(&state.pool, user.id, &token_hash, expires).await?;

    let reset_url = format!("{}/reset-password/{token}", state.config.client_url);
    state
        .mailer
        .send(
            &user.email,
            "Password Reset",
            &format!("You requested a password reset. Open this link to continue: {reset_url}"),
        )
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to send email: {e}")))?;

    Ok(Json(
        serde_json::json!({ "message": "Password reset email sent" }),
    ))
}

/// POST /api/user/reset-password/{token}
///
/// Verify the token hash inside its 10-minute window, set the new password,
/// and clear the token so it cannot be replayed.
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(input): Json<PasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let user = UserRepo::find_by_reset_token_hash(&state.pool, &hash_token(&token))
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired token".into()))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::reset_password(&state.pool, user.id, &password_hash).await?;

    Ok(Json(
        serde_json::json!({ "message": "Password reset successfully" }),
    ))
}

/// PUT /api/user/update-password
///
/// Authenticated password change.
pub async fn update_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if input.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".into()));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, auth.user.id, &password_hash).await?;

    Ok(Json(
        serde_json::json!({ "message": "Password updated successfully" }),
    ))
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// PUT /api/user/edit-profile
///
/// Multipart profile update with an optional replacement profile picture.
pub async fn edit_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let form = MultipartForm::parse(multipart).await?;

    let mut update = UpdateProfile {
        first_name: form.field("first_name").map(str::to_string),
        last_name: form.field("last_name").map(str::to_string),
        email: form.field("email").map(str::to_string),
        mobile: form.field("mobile").map(str::to_string),
        location: form.field("location").map(str::to_string),
        profile_picture: None,
    };

    if let Some(file) = form.file("profile_picture") {
        let url = media::store_upload(
            &state.config,
            file,
            UploadKind::Image,
            Some(PROFILE_PICTURE_EDGE),
        )
        .await?;
        update.profile_picture = Some(url);
    }

    let user = UserRepo::update_profile(&state.pool, auth.user.id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user.id,
        }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/user/set-preferred-language
pub async fn set_preferred_language(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PreferredLanguageRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user =
        UserRepo::set_preferred_language(&state.pool, auth.user.id, &input.preferred_language)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: auth.user.id,
            }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// GET /api/user/profile/{id}
pub async fn get_profile(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// DELETE /api/user/delete-user
///
/// Delete the authenticated user's own account.
pub async fn delete_self(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    UserRepo::delete(&state.pool, auth.user.id).await?;
    Ok(Json(
        serde_json::json!({ "message": "User deleted successfully" }),
    ))
}

// ---------------------------------------------------------------------------
// Admin user management
// ---------------------------------------------------------------------------

/// GET /api/user/all
///
/// List every account (admin only).
pub async fn list_users(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// DELETE /api/user/{id}
///
/// Delete any account by id (admin only).
pub async fn delete_user(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = UserRepo::delete(&state.pool, user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }));
    }
    Ok(Json(
        serde_json::json!({ "message": "User deleted successfully" }),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate tokens, persist the refresh hash, and build the login response.
async fn issue_session(state: &AppState, user: User) -> AppResult<impl IntoResponse> {
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    UserRepo::set_refresh_token_hash(&state.pool, user.id, Some(&refresh_hash)).await?;

    let cookie = build_refresh_cookie(
        &refresh_plaintext,
        state.config.jwt.refresh_token_expiry_hours * 3600,
    );

    tracing::info!(user_id = user.id, role = %user.role, "Login succeeded");

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(DataResponse {
            data: AuthResponse {
                token: access_token,
                user: UserResponse::from(user),
            },
        }),
    ))
}

/// Assemble a [`RegisterRequest`] from multipart text fields.
fn register_request_from_form(form: &MultipartForm) -> AppResult<RegisterRequest> {
    let required = |name: &str| -> AppResult<String> {
        form.field(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
    };

    let date_of_birth = match form.field("date_of_birth") {
        Some(raw) if !raw.trim().is_empty() => Some(
            raw.trim()
                .parse::<NaiveDate>()
                .map_err(|_| AppError::BadRequest("date_of_birth must be YYYY-MM-DD".into()))?,
        ),
        _ => None,
    };

    Ok(RegisterRequest {
        first_name: required("first_name")?,
        last_name: required("last_name")?,
        email: required("email")?,
        password: required("password")?,
        mobile: form.field("mobile").unwrap_or("N/A").to_string(),
        location: form.field("location").map(str::to_string),
        gender: form.field("gender").map(str::to_string),
        date_of_birth,
    })
}
