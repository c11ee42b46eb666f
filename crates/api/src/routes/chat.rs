//! Route definitions for chat-history capture and curation.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`.
///
/// ```text
/// POST /                      save_chat (authed)
/// GET  /                      list_chats (admin, ?status=)
/// PUT  /{id}/categorize       categorize_chat (admin)
/// POST /generate-book         generate_book from curated chapters (authed)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(chat::list_chats).post(chat::save_chat))
        .route("/generate-book", post(chat::generate_book))
        .route("/{id}/categorize", put(chat::categorize_chat))
}
