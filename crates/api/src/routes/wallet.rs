//! Route definitions for wallets.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::wallet;
use crate::state::AppState;

/// Routes mounted at `/wallet`.
///
/// ```text
/// POST /add     add_funds (creates the wallet on first use)
/// GET  /        get_wallet (balance + transaction log)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(wallet::get_wallet))
        .route("/add", post(wallet::add_funds))
}
