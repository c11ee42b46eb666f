//! Route definitions for trains.

use axum::routing::get;
use axum::Router;

use crate::handlers::train;
use crate::state::AppState;

/// Routes mounted at `/train`.
///
/// ```text
/// POST /            create_train (admin)
/// GET  /            list_trains (public)
/// GET  /{id}        get_train (public)
/// PUT  /{id}        update_train (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(train::list_trains).post(train::create_train))
        .route("/{id}", get(train::get_train).put(train::update_train))
}
