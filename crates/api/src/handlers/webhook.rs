//! The payment-processor webhook endpoint.
//!
//! The raw body is verified against the `Stripe-Signature` header before
//! anything else happens; a failed check is a 400 with no state change.
//! Completed-checkout updates are plain overwrites, so a replayed delivery
//! re-applies the same values harmlessly.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use fableloom_core::error::CoreError;
use fableloom_core::roles::{PREMIUM_INCOME, SUBSCRIPTION_PREMIUM};
use fableloom_core::types::DbId;
use fableloom_db::models::order::CheckoutCustomer;
use fableloom_db::repositories::{OrderRepo, UserRepo};
use fableloom_payments::webhook::{parse_event, WebhookEvent, EVENT_CHECKOUT_COMPLETED};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Header carrying the delivery signature.
const SIGNATURE_HEADER: &str = "stripe-signature";

/// POST /api/webhook
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<serde_json::Value>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::WebhookSignature("missing signature header".into()))?;

    let event = parse_event(
        &body,
        signature,
        &state.config.stripe_webhook_secret,
        Utc::now().timestamp(),
    )
    .map_err(|e| AppError::WebhookSignature(e.to_string()))?;

    if event.event_type != EVENT_CHECKOUT_COMPLETED {
        tracing::debug!(event_type = %event.event_type, "Ignoring webhook event");
        return Ok(Json(serde_json::json!({ "received": true })));
    }

    apply_checkout_completed(&state, &event).await?;

    Ok(Json(serde_json::json!({ "received": true })))
}

/// Apply a completed checkout to the order or user its metadata references.
async fn apply_checkout_completed(state: &AppState, event: &WebhookEvent) -> AppResult<()> {
    let session = &event.data.object;

    if let Some(order_id) = session.metadata.get("order_id") {
        let order_id: DbId = order_id
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid order_id in webhook metadata".into()))?;

        let customer = session
            .customer_details
            .as_ref()
            .map(|d| CheckoutCustomer {
                email: d.email.clone(),
                phone: d.phone.clone(),
                name: d.name.clone(),
            })
            .unwrap_or_default();

        OrderRepo::confirm_payment(&state.pool, order_id, &session.id, &customer)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Order",
                id: order_id,
            }))?;

        tracing::info!(order_id, event_id = %event.id, "Order confirmed by webhook");
        return Ok(());
    }

    if let Some(user_id) = session.metadata.get("user_id") {
        let user_id: DbId = user_id
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid user_id in webhook metadata".into()))?;

        let subscription_type = session
            .metadata
            .get("subscription_type")
            .map(String::as_str)
            .unwrap_or(SUBSCRIPTION_PREMIUM);
        let income = if subscription_type == SUBSCRIPTION_PREMIUM {
            PREMIUM_INCOME
        } else {
            0.0
        };

        let updated =
            UserRepo::update_subscription(&state.pool, user_id, subscription_type, income).await?;
        if !updated {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: user_id,
            }));
        }

        tracing::info!(
            user_id,
            subscription_type,
            event_id = %event.id,
            "Subscription updated by webhook"
        );
        return Ok(());
    }

    tracing::warn!(event_id = %event.id, "Completed checkout carries no known metadata");
    Ok(())
}
