//! Question entity model and DTOs. Questions carry bilingual text and are
//! served in creation order within their section.

use fableloom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full question row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: DbId,
    pub section_id: DbId,
    pub text_en: String,
    pub text_es: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Bilingual question text as sent by clients.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuestionText {
    pub en: String,
    pub es: String,
}

/// DTO for editing a single question's text.
#[derive(Debug, Deserialize)]
pub struct UpdateQuestion {
    pub text: QuestionText,
}
