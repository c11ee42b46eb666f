//! Repository for the `tickets` table.

use fableloom_core::types::DbId;
use sqlx::PgPool;

use crate::models::ticket::{PurchaseTicket, Ticket};

const COLUMNS: &str =
    "id, user_id, train_id, from_station_id, to_station_id, fare, travel_date, created_at";

/// Provides insert/list operations for purchased tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Insert a ticket for a user. Callers debit the wallet first.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &PurchaseTicket,
    ) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets (user_id, train_id, from_station_id, to_station_id, fare)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(user_id)
            .bind(input.train_id)
            .bind(input.from_station_id)
            .bind(input.to_station_id)
            .bind(input.fare)
            .fetch_one(pool)
            .await
    }

    /// List a user's tickets, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Ticket>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tickets WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
