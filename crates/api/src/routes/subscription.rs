//! Route definitions for subscription plans and the subscription checkout.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::subscription;
use crate::state::AppState;

/// Routes mounted at `/subscription`.
///
/// ```text
/// POST   /                        create_plan (admin)
/// GET    /                        list_plans
/// GET    /{id}                    get_plan
/// PUT    /{id}                    update_plan (admin)
/// DELETE /{id}                    delete_plan (admin)
/// POST   /create-subscription     checkout for a plan (authed)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(subscription::list_plans).post(subscription::create_plan),
        )
        .route(
            "/create-subscription",
            post(subscription::create_subscription),
        )
        .route(
            "/{id}",
            get(subscription::get_plan)
                .put(subscription::update_plan)
                .delete(subscription::delete_plan),
        )
}
