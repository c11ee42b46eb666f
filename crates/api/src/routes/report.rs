//! Route definitions for the admin reports.

use axum::routing::get;
use axum::Router;

use crate::handlers::report;
use crate::state::AppState;

/// Routes mounted at `/report` (all admin only).
///
/// ```text
/// GET /income-report         order + subscription income per month
/// GET /subscriber-growth     premium share per signup month
/// GET /user-growth           signups per month
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/income-report", get(report::income_report))
        .route("/subscriber-growth", get(report::subscriber_growth))
        .route("/user-growth", get(report::user_growth))
}
