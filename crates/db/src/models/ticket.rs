//! Ticket entity model and DTOs.

use fableloom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full ticket row from the `tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub user_id: DbId,
    pub train_id: DbId,
    pub from_station_id: DbId,
    pub to_station_id: DbId,
    pub fare: f64,
    pub travel_date: Timestamp,
    pub created_at: Timestamp,
}

/// Request body for a ticket purchase.
#[derive(Debug, Deserialize)]
pub struct PurchaseTicket {
    pub train_id: DbId,
    pub from_station_id: DbId,
    pub to_station_id: DbId,
    pub fare: f64,
}
