//! Route definitions for print orders.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::order;
use crate::state::AppState;

/// Routes mounted at `/order`.
///
/// ```text
/// POST /create-order             create_order (multipart, returns checkout URL)
/// GET  /all-orders               list_orders (admin)
/// GET  /order-details/{id}       order_details
/// PUT  /update-status/{id}       update_status (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-order", post(order::create_order))
        .route("/all-orders", get(order::list_orders))
        .route("/order-details/{id}", get(order::order_details))
        .route("/update-status/{id}", put(order::update_status))
}
