//! Route definitions for tickets.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ticket;
use crate::state::AppState;

/// Routes mounted at `/ticket`.
///
/// ```text
/// POST /purchase       purchase_ticket (wallet debit + ticket)
/// GET  /my-tickets     list_my_tickets
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/purchase", post(ticket::purchase_ticket))
        .route("/my-tickets", get(ticket::list_my_tickets))
}
