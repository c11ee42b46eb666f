//! Repository for the `trains` table.

use fableloom_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::train::{CreateTrain, Train, UpdateTrain};

const COLUMNS: &str = "id, name, stops, created_at, updated_at";

/// Provides CRUD operations for trains and their stop schedules.
pub struct TrainRepo;

impl TrainRepo {
    /// Insert a new train with its stops.
    pub async fn create(pool: &PgPool, input: &CreateTrain) -> Result<Train, sqlx::Error> {
        let query = format!(
            "INSERT INTO trains (name, stops)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Train>(&query)
            .bind(&input.name)
            .bind(Json(&input.stops))
            .fetch_one(pool)
            .await
    }

    /// Find a train by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Train>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trains WHERE id = $1");
        sqlx::query_as::<_, Train>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all trains in creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Train>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trains ORDER BY created_at, id");
        sqlx::query_as::<_, Train>(&query).fetch_all(pool).await
    }

    /// Update a train's name and/or full stop list.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrain,
    ) -> Result<Option<Train>, sqlx::Error> {
        let query = format!(
            "UPDATE trains SET
                name = COALESCE($2, name),
                stops = COALESCE($3, stops),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Train>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.stops.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }
}
