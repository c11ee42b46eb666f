//! Route tree for the fableloom API.
//!
//! One module per resource, each exposing a `router()` mounted under its
//! path prefix by [`api_routes`]. The health check lives at the root.

pub mod admin;
pub mod book;
pub mod chat;
pub mod coupon;
pub mod health;
pub mod order;
pub mod policy;
pub mod question;
pub mod report;
pub mod section;
pub mod station;
pub mod subscription;
pub mod ticket;
pub mod train;
pub mod user;
pub mod wallet;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /user/...              accounts, sessions, password flows, admin management
/// /book/...              books, episodes, conversational question flow
/// /section/...           section catalog
/// /question/...          question catalog
/// /order/...             print orders + checkout handoff
/// /subscription/...      plan catalog + subscription checkout
/// /coupon/...            coupons + apply
/// /station/...           stations
/// /train/...             trains and stop schedules
/// /ticket/...            ticket purchase (wallet debit)
/// /wallet/...            wallet balance and credits
/// /policy                terms and privacy documents
/// /admin/...             notification feed
/// /report/...            monthly aggregation reports
/// /chat/...              chat capture and curation
/// /webhook               payment-processor webhook (raw body)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/user", user::router())
        .nest("/book", book::router())
        .nest("/section", section::router())
        .nest("/question", question::router())
        .nest("/order", order::router())
        .nest("/subscription", subscription::router())
        .nest("/coupon", coupon::router())
        .nest("/station", station::router())
        .nest("/train", train::router())
        .nest("/ticket", ticket::router())
        .nest("/wallet", wallet::router())
        .nest("/policy", policy::router())
        .nest("/admin", admin::router())
        .nest("/report", report::router())
        .nest("/chat", chat::router())
        .route("/webhook", post(handlers::webhook::handle_webhook))
}
