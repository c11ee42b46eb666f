//! Route definitions for coupons.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::coupon;
use crate::state::AppState;

/// Routes mounted at `/coupon`.
///
/// ```text
/// POST   /            create_coupon (admin)
/// GET    /            list_coupons (admin, ?status=)
/// PUT    /{id}        update_coupon (admin)
/// DELETE /{id}        delete_coupon (admin)
/// POST   /apply       apply_coupon (authed)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(coupon::list_coupons).post(coupon::create_coupon))
        .route("/apply", post(coupon::apply_coupon))
        .route(
            "/{id}",
            put(coupon::update_coupon).delete(coupon::delete_coupon),
        )
}
