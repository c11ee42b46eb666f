//! Book entity model. Episodes (with their conversation turns) are stored
//! in the `episodes` JSONB column as an owned, ordered list.

use fableloom_core::story::Episode;
use fableloom_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// Full book row from the `books` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub cover_image: String,
    pub status: String,
    pub percentage: i32,
    pub episodes: Json<Vec<Episode>>,
    pub finalized_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new book.
#[derive(Debug)]
pub struct CreateBook {
    pub user_id: DbId,
    pub title: String,
    pub cover_image: String,
    pub episodes: Vec<Episode>,
}

/// DTO for book updates. Only non-`None` fields are applied; `finalized_at`
/// is set by the repository when `status` moves to final.
#[derive(Debug, Default)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub percentage: Option<i32>,
    pub cover_image: Option<String>,
    pub status: Option<String>,
}
