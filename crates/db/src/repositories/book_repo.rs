//! Repository for the `books` table.
//!
//! All reads and writes of a user's book go through owner-scoped queries
//! (`id` + `user_id`), so one user can never touch another user's books.
//! Episodes are replaced wholesale as a single JSONB value, which keeps the
//! book an atomic document.

use fableloom_core::story::Episode;
use fableloom_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::book::{Book, CreateBook, UpdateBook};

const COLUMNS: &str = "id, user_id, title, cover_image, status, percentage, episodes, \
                        finalized_at, created_at, updated_at";

/// Provides CRUD operations for books and their embedded episodes.
pub struct BookRepo;

impl BookRepo {
    /// Insert a new draft book with its snapshotted episodes.
    pub async fn create(pool: &PgPool, input: &CreateBook) -> Result<Book, sqlx::Error> {
        let query = format!(
            "INSERT INTO books (user_id, title, cover_image, episodes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.cover_image)
            .bind(Json(&input.episodes))
            .fetch_one(pool)
            .await
    }

    /// List all books owned by a user, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Book>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM books WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Book>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find a book by id, scoped to its owner.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a book by id without owner scoping (admin/catalog paths).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a book's metadata. Only non-`None` fields are applied.
    ///
    /// `finalized_at` is stamped the first time the status lands on `final`.
    /// Returns `None` if the book does not exist or is not owned by `user_id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateBook,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!(
            "UPDATE books SET
                title = COALESCE($3, title),
                percentage = COALESCE($4, percentage),
                cover_image = COALESCE($5, cover_image),
                status = COALESCE($6, status),
                finalized_at = CASE
                    WHEN COALESCE($6, status) = 'final' AND finalized_at IS NULL THEN NOW()
                    ELSE finalized_at
                END,
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(input.percentage)
            .bind(&input.cover_image)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Replace the whole episode list in one atomic write.
    pub async fn update_episodes(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        episodes: &[Episode],
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!(
            "UPDATE books SET episodes = $3, updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(user_id)
            .bind(Json(episodes))
            .fetch_optional(pool)
            .await
    }

    /// Delete a book, scoped to its owner. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
