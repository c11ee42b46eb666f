//! Route definitions for the platform policy document.

use axum::routing::get;
use axum::Router;

use crate::handlers::policy;
use crate::state::AppState;

/// Routes mounted at `/policy`.
///
/// ```text
/// GET /        get_policies (public)
/// PUT /        upsert_policies (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(policy::get_policies).put(policy::upsert_policies))
}
