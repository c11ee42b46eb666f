//! Route definitions for stations.

use axum::routing::get;
use axum::Router;

use crate::handlers::station;
use crate::state::AppState;

/// Routes mounted at `/station`.
///
/// ```text
/// POST /            create_station (admin)
/// GET  /            list_stations (public)
/// GET  /{id}        get_station (public)
/// PUT  /{id}        update_station (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(station::list_stations).post(station::create_station),
        )
        .route(
            "/{id}",
            get(station::get_station).put(station::update_station),
        )
}
