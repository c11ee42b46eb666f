//! Route definitions for the section catalog.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::section;
use crate::state::AppState;

/// Routes mounted at `/section`.
///
/// ```text
/// POST   /              create_section
/// GET    /              list_sections (with live question counts)
/// PUT    /{id}          update_section
/// DELETE /{id}          delete_section (admin; cascades questions)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(section::list_sections).post(section::create_section),
        )
        .route(
            "/{id}",
            put(section::update_section).delete(section::delete_section),
        )
}
