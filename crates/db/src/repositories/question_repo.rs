//! Repository for the `questions` table.
//!
//! Question order within a section is creation order (`created_at`, then
//! `id` to break ties for same-batch inserts); the conversational flow
//! depends on that ordering being stable.

use fableloom_core::types::DbId;
use sqlx::PgPool;

use crate::models::question::{Question, QuestionText};

const COLUMNS: &str = "id, section_id, text_en, text_es, created_at, updated_at";

/// Provides CRUD operations for questions.
pub struct QuestionRepo;

impl QuestionRepo {
    /// Insert a batch of questions into a section in one statement,
    /// preserving the order of `texts`.
    pub async fn insert_many(
        pool: &PgPool,
        section_id: DbId,
        texts: &[QuestionText],
    ) -> Result<Vec<Question>, sqlx::Error> {
        let en: Vec<String> = texts.iter().map(|t| t.en.clone()).collect();
        let es: Vec<String> = texts.iter().map(|t| t.es.clone()).collect();

        let query = format!(
            "INSERT INTO questions (section_id, text_en, text_es)
             SELECT $1, u.en, u.es
             FROM UNNEST($2::text[], $3::text[]) WITH ORDINALITY AS u(en, es, ord)
             ORDER BY u.ord
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(section_id)
            .bind(&en)
            .bind(&es)
            .fetch_all(pool)
            .await
    }

    /// Find a question by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Question>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM questions WHERE id = $1");
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a section's questions in serving order.
    pub async fn list_by_section(
        pool: &PgPool,
        section_id: DbId,
    ) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questions WHERE section_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(section_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch the question at `index` (0-based) in a section's serving order.
    pub async fn nth_for_section(
        pool: &PgPool,
        section_id: DbId,
        index: i64,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questions WHERE section_id = $1
             ORDER BY created_at, id
             LIMIT 1 OFFSET $2"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(section_id)
            .bind(index)
            .fetch_optional(pool)
            .await
    }

    /// Count the questions in a section.
    pub async fn count_for_section(pool: &PgPool, section_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE section_id = $1")
            .bind(section_id)
            .fetch_one(pool)
            .await
    }

    /// Update a question's bilingual text.
    pub async fn update_text(
        pool: &PgPool,
        id: DbId,
        text: &QuestionText,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!(
            "UPDATE questions SET text_en = $2, text_es = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .bind(&text.en)
            .bind(&text.es)
            .fetch_optional(pool)
            .await
    }

    /// Delete a question, returning the deleted row so callers can decrement
    /// the owning section's counter.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Question>, sqlx::Error> {
        let query = format!("DELETE FROM questions WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
