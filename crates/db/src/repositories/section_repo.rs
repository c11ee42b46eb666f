//! Repository for the `sections` table.

use fableloom_core::types::DbId;
use sqlx::PgPool;

use crate::models::section::{CreateSection, Section, SectionWithCount, UpdateSection};

const COLUMNS: &str =
    "id, name_en, name_es, number_of_questions, published, episode_index, created_at, updated_at";

/// Provides CRUD operations for sections.
pub struct SectionRepo;

impl SectionRepo {
    /// Insert a new section, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSection) -> Result<Section, sqlx::Error> {
        let query = format!(
            "INSERT INTO sections (name_en, name_es, number_of_questions, episode_index)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(&input.name_en)
            .bind(&input.name_es)
            .bind(input.number_of_questions)
            .bind(input.episode_index)
            .fetch_one(pool)
            .await
    }

    /// Find a section by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Section>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sections WHERE id = $1");
        sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all sections in creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Section>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sections ORDER BY created_at, id");
        sqlx::query_as::<_, Section>(&query).fetch_all(pool).await
    }

    /// List all sections with their live question counts.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<SectionWithCount>, sqlx::Error> {
        sqlx::query_as::<_, SectionWithCount>(
            "SELECT s.id, s.name_en, s.name_es, s.number_of_questions, s.published,
                    s.episode_index, s.created_at, s.updated_at,
                    COUNT(q.id) AS questions_count
             FROM sections s
             LEFT JOIN questions q ON q.section_id = s.id
             GROUP BY s.id
             ORDER BY s.created_at, s.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Update a section. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSection,
    ) -> Result<Option<Section>, sqlx::Error> {
        let query = format!(
            "UPDATE sections SET
                name_en = COALESCE($2, name_en),
                name_es = COALESCE($3, name_es),
                number_of_questions = COALESCE($4, number_of_questions),
                published = COALESCE($5, published),
                episode_index = COALESCE($6, episode_index),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .bind(&input.name_en)
            .bind(&input.name_es)
            .bind(input.number_of_questions)
            .bind(input.published)
            .bind(input.episode_index)
            .fetch_optional(pool)
            .await
    }

    /// Adjust the maintained question counter by `delta` (may be negative).
    pub async fn adjust_question_count(
        pool: &PgPool,
        id: DbId,
        delta: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE sections SET
                number_of_questions = GREATEST(number_of_questions + $2, 0),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(delta)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Delete a section. Its questions go with it via `ON DELETE CASCADE`.
    /// Returns the deleted row, or `None` if the id did not resolve.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Section>, sqlx::Error> {
        let query = format!("DELETE FROM sections WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
