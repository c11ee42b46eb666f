//! Route definitions for the admin notification feed.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin` (all admin only).
///
/// ```text
/// GET /notifications                 list_notifications (newest first)
/// PUT /notifications/{id}/read       mark_notification_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(admin::list_notifications))
        .route(
            "/notifications/{id}/read",
            put(admin::mark_notification_read),
        )
}
