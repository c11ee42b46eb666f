//! Repository for the `notifications` table.

use fableloom_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{Notification, NotificationWithContext};

const COLUMNS: &str = "id, message, user_id, order_id, status, created_at";

/// Provides operations for the admin notification feed.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert an unread notification referencing a user and an order.
    pub async fn create(
        pool: &PgPool,
        message: &str,
        user_id: DbId,
        order_id: DbId,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (message, user_id, order_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(message)
            .bind(user_id)
            .bind(order_id)
            .fetch_one(pool)
            .await
    }

    /// List all notifications with their user/order context, newest first.
    pub async fn list_with_context(
        pool: &PgPool,
    ) -> Result<Vec<NotificationWithContext>, sqlx::Error> {
        sqlx::query_as::<_, NotificationWithContext>(
            "SELECT n.id, n.message, n.user_id, n.order_id, n.status, n.created_at,
                    u.first_name, u.last_name, u.email,
                    o.book_title, o.total AS order_total, o.status AS order_status
             FROM notifications n
             LEFT JOIN users u ON u.id = n.user_id
             LEFT JOIN orders o ON o.id = n.order_id
             ORDER BY n.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Mark a notification as read.
    pub async fn mark_read(pool: &PgPool, id: DbId) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications SET status = 'read' WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
