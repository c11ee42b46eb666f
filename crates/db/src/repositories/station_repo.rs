//! Repository for the `stations` table.

use fableloom_core::types::DbId;
use sqlx::PgPool;

use crate::models::station::{CreateStation, Station, UpdateStation};

const COLUMNS: &str = "id, name, code, city, created_at, updated_at";

/// Provides CRUD operations for stations.
pub struct StationRepo;

impl StationRepo {
    /// Insert a new station, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStation) -> Result<Station, sqlx::Error> {
        let query = format!(
            "INSERT INTO stations (name, code, city)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Station>(&query)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.city)
            .fetch_one(pool)
            .await
    }

    /// Find a station by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Station>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stations WHERE id = $1");
        sqlx::query_as::<_, Station>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all stations in creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Station>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stations ORDER BY created_at, id");
        sqlx::query_as::<_, Station>(&query).fetch_all(pool).await
    }

    /// Update a station. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStation,
    ) -> Result<Option<Station>, sqlx::Error> {
        let query = format!(
            "UPDATE stations SET
                name = COALESCE($2, name),
                code = COALESCE($3, code),
                city = COALESCE($4, city),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Station>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.city)
            .fetch_optional(pool)
            .await
    }
}
