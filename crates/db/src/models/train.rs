//! Train entity model. A train owns its ordered stop list as JSONB.

use fableloom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// One scheduled stop on a train's route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainStop {
    pub station_id: DbId,
    pub arrival_time: String,
    pub departure_time: String,
}

/// Full train row from the `trains` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Train {
    pub id: DbId,
    pub name: String,
    pub stops: Json<Vec<TrainStop>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a train with its stops.
#[derive(Debug, Deserialize)]
pub struct CreateTrain {
    pub name: String,
    #[serde(default)]
    pub stops: Vec<TrainStop>,
}

/// DTO for updating a train. Only non-`None` fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateTrain {
    pub name: Option<String>,
    pub stops: Option<Vec<TrainStop>>,
}
