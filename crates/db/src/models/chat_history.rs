//! Raw chat history captured for later curation.

use fableloom_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// Chat status for freshly captured prompts.
pub const CHAT_RAW: &str = "raw";

/// Chat status after curation.
pub const CHAT_CATEGORIZED: &str = "categorized";

/// Full chat history row from the `chat_histories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatHistory {
    pub id: DbId,
    pub user_id: DbId,
    pub prompts: Json<Vec<String>>,
    pub categorized_data: Json<Vec<String>>,
    pub status: String,
    pub created_at: Timestamp,
}
