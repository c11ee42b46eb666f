//! Handlers for the `/coupon` resource: admin CRUD plus the user-facing
//! apply endpoint.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use fableloom_core::coupon::{apply_discount, check_validity};
use fableloom_core::error::CoreError;
use fableloom_core::types::DbId;
use fableloom_db::models::coupon::{Coupon, CreateCoupon, UpdateCoupon};
use fableloom_db::repositories::CouponRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /coupon/apply`.
#[derive(Debug, Deserialize)]
pub struct ApplyCouponRequest {
    pub code: String,
    pub total_price: f64,
}

/// POST /api/coupon
pub async fn create_coupon(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCoupon>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if input.end_date < input.start_date {
        return Err(AppError::BadRequest(
            "end_date must not precede start_date".into(),
        ));
    }

    let coupon = CouponRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: coupon })))
}

/// GET /api/coupon
///
/// List coupons, optionally filtered by `?status=` (admin only).
pub async fn list_coupons(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Coupon>>>> {
    let coupons = CouponRepo::list(&state.pool, params.status.as_deref()).await?;
    Ok(Json(DataResponse { data: coupons }))
}

/// PUT /api/coupon/{id}
pub async fn update_coupon(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(coupon_id): Path<DbId>,
    Json(input): Json<UpdateCoupon>,
) -> AppResult<Json<DataResponse<Coupon>>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let coupon = CouponRepo::update(&state.pool, coupon_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Coupon",
            id: coupon_id,
        }))?;

    Ok(Json(DataResponse { data: coupon }))
}

/// DELETE /api/coupon/{id}
pub async fn delete_coupon(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(coupon_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Coupon>>> {
    let coupon = CouponRepo::delete(&state.pool, coupon_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Coupon",
            id: coupon_id,
        }))?;

    Ok(Json(DataResponse { data: coupon }))
}

/// POST /api/coupon/apply
///
/// Validate a coupon against its status and validity window and compute the
/// discounted total. Invalid or expired coupons are a 400, unknown codes a
/// 404; nothing is persisted.
pub async fn apply_coupon(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ApplyCouponRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if input.code.trim().is_empty() {
        return Err(AppError::BadRequest("Coupon code is required".into()));
    }

    let coupon = CouponRepo::find_by_code(&state.pool, input.code.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundMessage("Invalid coupon code".into()))
        })?;

    check_validity(&coupon.status, coupon.start_date, coupon.end_date, Utc::now())?;
    let applied = apply_discount(input.total_price, coupon.discount)?;

    Ok(Json(serde_json::json!({
        "message": "Coupon applied successfully",
        "discount_amount": applied.discount_amount,
        "final_price": applied.final_price,
    })))
}
