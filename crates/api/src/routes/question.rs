//! Route definitions for the question catalog.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::question;
use crate::state::AppState;

/// Routes mounted at `/question`.
///
/// ```text
/// POST   /                          add_questions (batch)
/// PUT    /{id}                      update_question
/// DELETE /{id}                      delete_question (admin)
/// GET    /section/{section_id}      list_by_section
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(question::add_questions))
        .route(
            "/{id}",
            put(question::update_question).delete(question::delete_question),
        )
        .route("/section/{section_id}", get(question::list_by_section))
}
