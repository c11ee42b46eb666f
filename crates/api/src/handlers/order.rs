//! Handlers for the `/order` resource: order creation with checkout-session
//! handoff, admin listing, detail lookup, and status updates.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use fableloom_core::error::CoreError;
use fableloom_core::pricing::order_total;
use fableloom_core::types::DbId;
use fableloom_db::models::order::{
    CreateOrder, Order, OrderWithCustomer, ShippingAddress, ORDER_STATUSES,
};
use fableloom_db::repositories::{NotificationRepo, OrderRepo};
use fableloom_payments::CheckoutRequest;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::media::{self, MultipartForm, UploadKind};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for the admin status update.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// POST /api/order/create-order
///
/// Multipart: `book_title`, `quantity`, `price`, `shipping_address` (a JSON
/// object as a string), and an optional `pdf` file. Creates the pending
/// order, notifies the admins, and returns the checkout redirect URL.
pub async fn create_order(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<serde_json::Value>> {
    let form = MultipartForm::parse(multipart).await?;

    let book_title = form
        .field("book_title")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("book_title is required".into()))?
        .to_string();

    let quantity: i64 = form
        .field("quantity")
        .unwrap_or("1")
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("quantity must be a positive integer".into()))?;

    let price: f64 = form
        .field("price")
        .ok_or_else(|| AppError::BadRequest("price is required".into()))?
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("price must be a number".into()))?;

    let shipping_address: ShippingAddress = match form.field("shipping_address") {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|_| AppError::BadRequest("Invalid shipping address format".into()))?,
        None => ShippingAddress::default(),
    };

    let total = order_total(quantity, price)?;

    let pdf_link = match form.file("pdf") {
        Some(file) => media::store_upload(&state.config, file, UploadKind::Pdf, None).await?,
        None => String::new(),
    };

    let order = OrderRepo::create(
        &state.pool,
        &CreateOrder {
            user_id: auth.user.id,
            book_title: book_title.clone(),
            quantity,
            price,
            total,
            shipping_address,
            pdf_link,
        },
    )
    .await?;

    let message = format!(
        "{} {} ordered {book_title} ({quantity} copies)",
        auth.user.first_name, auth.user.last_name
    );
    NotificationRepo::create(&state.pool, &message, auth.user.id, order.id).await?;

    let session = state
        .checkout
        .create_session(&CheckoutRequest {
            product_name: book_title,
            unit_amount_cents: (price * 100.0).round() as i64,
            quantity,
            metadata: vec![("order_id".to_string(), order.id.to_string())],
            success_url: format!("{}/order-success/{}", state.config.client_url, order.id),
            cancel_url: format!("{}/order-cancel/{}", state.config.client_url, order.id),
            with_shipping_options: true,
            collect_phone: true,
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Checkout session error: {e}")))?;

    tracing::info!(order_id = order.id, user_id = auth.user.id, "Order created");

    Ok(Json(serde_json::json!({ "url": session.url })))
}

/// GET /api/order/all-orders
///
/// Every order with its customer context (admin only).
pub async fn list_orders(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<OrderWithCustomer>>>> {
    let orders = OrderRepo::list_with_customers(&state.pool).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/order/order-details/{id}
pub async fn order_details(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Order>>> {
    let order = OrderRepo::find_by_id(&state.pool, order_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id: order_id,
        }))?;

    Ok(Json(DataResponse { data: order }))
}

/// PUT /api/order/update-status/{id}
///
/// Admin override of an order's status.
pub async fn update_status(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<Order>>> {
    if !ORDER_STATUSES.contains(&input.status.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Invalid status '{}'",
            input.status
        )));
    }

    let order = OrderRepo::update_status(&state.pool, order_id, &input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id: order_id,
        }))?;

    Ok(Json(DataResponse { data: order }))
}
