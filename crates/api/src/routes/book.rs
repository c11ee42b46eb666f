//! Route definitions for books, their episodes, and the conversational
//! question flow.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::book;
use crate::state::AppState;

/// Routes mounted at `/book`.
///
/// ```text
/// POST   /create                                          create_book (multipart)
/// GET    /user-books                                      list_books
/// GET    /{book_id}                                       get_book
/// PUT    /{book_id}                                       update_book (multipart)
/// DELETE /{book_id}                                       delete_book
///
/// GET    /{book_id}/episodes                              list_episodes
/// GET    /{book_id}/episode/{i}                           get_episode
/// PUT    /{book_id}/episode/{i}                           update_episode (multipart)
/// DELETE /{book_id}/episode/{i}                           delete_episode
///
/// GET    /{book_id}/episode/{i}/start-conversation        first question
/// POST   /{book_id}/episode/{i}/answer                    submit_answer
/// GET    /{book_id}/episode/{i}/next-question             next_question
/// POST   /{book_id}/episode/{i}/generate-story            generate_story
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(book::create_book))
        .route("/user-books", get(book::list_books))
        .route(
            "/{book_id}",
            get(book::get_book)
                .put(book::update_book)
                .delete(book::delete_book),
        )
        .route("/{book_id}/episodes", get(book::list_episodes))
        .route(
            "/{book_id}/episode/{episode_index}",
            get(book::get_episode)
                .put(book::update_episode)
                .delete(book::delete_episode),
        )
        .route(
            "/{book_id}/episode/{episode_index}/start-conversation",
            get(book::start_conversation),
        )
        .route(
            "/{book_id}/episode/{episode_index}/answer",
            post(book::submit_answer),
        )
        .route(
            "/{book_id}/episode/{episode_index}/next-question",
            get(book::next_question),
        )
        .route(
            "/{book_id}/episode/{episode_index}/generate-story",
            post(book::generate_story),
        )
}
