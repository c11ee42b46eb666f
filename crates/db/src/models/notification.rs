//! Notification entity model.

use fableloom_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Unread notification status (initial).
pub const NOTIFICATION_UNREAD: &str = "unread";

/// Read notification status (set by an admin).
pub const NOTIFICATION_READ: &str = "read";

/// Full notification row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub message: String,
    pub user_id: Option<DbId>,
    pub order_id: Option<DbId>,
    pub status: String,
    pub created_at: Timestamp,
}

/// Notification joined with the referenced user and order, for the admin
/// notification feed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationWithContext {
    pub id: DbId,
    pub message: String,
    pub user_id: Option<DbId>,
    pub order_id: Option<DbId>,
    pub status: String,
    pub created_at: Timestamp,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub book_title: Option<String>,
    pub order_total: Option<f64>,
    pub order_status: Option<String>,
}
