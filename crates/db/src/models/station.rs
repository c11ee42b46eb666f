//! Station entity model and DTOs.

use fableloom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full station row from the `stations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Station {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub city: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a station.
#[derive(Debug, Deserialize)]
pub struct CreateStation {
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub city: String,
}

/// DTO for updating a station. Only non-`None` fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateStation {
    pub name: Option<String>,
    pub code: Option<String>,
    pub city: Option<String>,
}
