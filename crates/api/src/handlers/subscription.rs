//! Handlers for the `/subscription` resource: admin plan CRUD and the
//! user-facing subscription checkout.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fableloom_core::error::CoreError;
use fableloom_core::roles::SUBSCRIPTION_PREMIUM;
use fableloom_core::types::DbId;
use fableloom_db::models::subscription_plan::{
    CreateSubscriptionPlan, SubscriptionPlan, UpdateSubscriptionPlan,
};
use fableloom_db::repositories::SubscriptionPlanRepo;
use fableloom_payments::CheckoutRequest;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /subscription/create-subscription`.
#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub plan_id: DbId,
}

// ---------------------------------------------------------------------------
// Plan catalog (admin CRUD)
// ---------------------------------------------------------------------------

/// POST /api/subscription
pub async fn create_plan(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateSubscriptionPlan>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".into()));
    }
    if input.price <= 0.0 {
        return Err(AppError::BadRequest("Price must be greater than zero".into()));
    }
    if !(0.0..=100.0).contains(&input.discount) {
        return Err(AppError::BadRequest(
            "Discount must be between 0 and 100".into(),
        ));
    }

    let plan = SubscriptionPlanRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: plan })))
}

/// GET /api/subscription
pub async fn list_plans(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SubscriptionPlan>>>> {
    let plans = SubscriptionPlanRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: plans }))
}

/// GET /api/subscription/{id}
pub async fn get_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SubscriptionPlan>>> {
    let plan = SubscriptionPlanRepo::find_by_id(&state.pool, plan_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription plan",
            id: plan_id,
        }))?;

    Ok(Json(DataResponse { data: plan }))
}

/// PUT /api/subscription/{id}
///
/// The discounted price is recomputed by the repository from the resolved
/// price and discount; clients cannot set it directly.
pub async fn update_plan(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(plan_id): Path<DbId>,
    Json(input): Json<UpdateSubscriptionPlan>,
) -> AppResult<Json<DataResponse<SubscriptionPlan>>> {
    if let Some(discount) = input.discount {
        if !(0.0..=100.0).contains(&discount) {
            return Err(AppError::BadRequest(
                "Discount must be between 0 and 100".into(),
            ));
        }
    }
    if let Some(price) = input.price {
        if price <= 0.0 {
            return Err(AppError::BadRequest("Price must be greater than zero".into()));
        }
    }

    let plan = SubscriptionPlanRepo::update(&state.pool, plan_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription plan",
            id: plan_id,
        }))?;

    Ok(Json(DataResponse { data: plan }))
}

/// DELETE /api/subscription/{id}
pub async fn delete_plan(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(plan_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = SubscriptionPlanRepo::delete(&state.pool, plan_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Subscription plan",
            id: plan_id,
        }));
    }
    Ok(Json(
        serde_json::json!({ "message": "Subscription plan deleted successfully" }),
    ))
}

// ---------------------------------------------------------------------------
// Subscription checkout
// ---------------------------------------------------------------------------

/// POST /api/subscription/create-subscription
///
/// Build a checkout session for a plan at its discounted price. The session
/// metadata carries the user id and target tier; the completion webhook
/// applies the upgrade.
pub async fn create_subscription(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSubscriptionRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let plan = SubscriptionPlanRepo::find_by_id(&state.pool, input.plan_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription plan",
            id: input.plan_id,
        }))?;

    let session = state
        .checkout
        .create_session(&CheckoutRequest {
            product_name: plan.title.clone(),
            unit_amount_cents: (plan.discounted_price * 100.0).round() as i64,
            quantity: 1,
            metadata: vec![
                ("user_id".to_string(), auth.user.id.to_string()),
                (
                    "subscription_type".to_string(),
                    SUBSCRIPTION_PREMIUM.to_string(),
                ),
            ],
            success_url: format!("{}/subscription-success", state.config.client_url),
            cancel_url: format!("{}/subscription-cancel", state.config.client_url),
            with_shipping_options: false,
            collect_phone: false,
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Checkout session error: {e}")))?;

    tracing::info!(
        user_id = auth.user.id,
        plan_id = plan.id,
        "Subscription checkout created"
    );

    Ok(Json(serde_json::json!({ "url": session.url })))
}
