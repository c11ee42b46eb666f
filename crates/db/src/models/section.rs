//! Section entity model and DTOs.

use fableloom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full section row from the `sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Section {
    pub id: DbId,
    pub name_en: String,
    pub name_es: String,
    /// Maintained by the question handlers, not a database constraint.
    pub number_of_questions: i32,
    pub published: bool,
    pub episode_index: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Section row plus the live question count for listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SectionWithCount {
    pub id: DbId,
    pub name_en: String,
    pub name_es: String,
    pub number_of_questions: i32,
    pub published: bool,
    pub episode_index: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub questions_count: i64,
}

/// DTO for creating a section.
#[derive(Debug, Deserialize)]
pub struct CreateSection {
    pub name_en: String,
    pub name_es: String,
    #[serde(default)]
    pub number_of_questions: i32,
    pub episode_index: Option<i32>,
}

/// DTO for updating a section. Only non-`None` fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateSection {
    pub name_en: Option<String>,
    pub name_es: Option<String>,
    pub number_of_questions: Option<i32>,
    pub published: Option<bool>,
    pub episode_index: Option<i32>,
}
