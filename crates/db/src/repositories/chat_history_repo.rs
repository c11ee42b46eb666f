//! Repository for the `chat_histories` table.

use fableloom_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::chat_history::ChatHistory;

const COLUMNS: &str = "id, user_id, prompts, categorized_data, status, created_at";

/// Provides capture/curation operations for chat histories.
pub struct ChatHistoryRepo;

impl ChatHistoryRepo {
    /// Capture a batch of raw prompts for a user.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        prompts: &[String],
    ) -> Result<ChatHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_histories (user_id, prompts)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChatHistory>(&query)
            .bind(user_id)
            .bind(Json(prompts))
            .fetch_one(pool)
            .await
    }

    /// List chat histories with a given curation status.
    pub async fn list_by_status(
        pool: &PgPool,
        status: &str,
    ) -> Result<Vec<ChatHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chat_histories WHERE status = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ChatHistory>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Attach curated data to a chat and mark it categorized.
    pub async fn categorize(
        pool: &PgPool,
        id: DbId,
        categorized_data: &[String],
    ) -> Result<Option<ChatHistory>, sqlx::Error> {
        let query = format!(
            "UPDATE chat_histories SET categorized_data = $2, status = 'categorized'
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChatHistory>(&query)
            .bind(id)
            .bind(Json(categorized_data))
            .fetch_optional(pool)
            .await
    }
}
