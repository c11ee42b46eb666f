//! Repository for the `users` table.

use fableloom_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateProfile, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, email, password_hash, mobile, location, \
                        gender, date_of_birth, profile_picture, preferred_language, role, \
                        subscription_type, income, is_blocked, refresh_token_hash, \
                        password_reset_token_hash, password_reset_expires, created_at, updated_at";

/// Provides CRUD and credential-management operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (first_name, last_name, email, password_hash, mobile, \
                                location, gender, date_of_birth, profile_picture, role)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, DATE '2000-01-01'), $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.mobile)
            .bind(&input.location)
            .bind(&input.gender)
            .bind(input.date_of_birth)
            .bind(&input.profile_picture)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// List all admin accounts.
    pub async fn list_admins(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM users WHERE role = 'admin' ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Update profile fields. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                mobile = COALESCE($5, mobile),
                location = COALESCE($6, location),
                profile_picture = COALESCE($7, profile_picture),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.mobile)
            .bind(&input.location)
            .bind(&input.profile_picture)
            .fetch_optional(pool)
            .await
    }

    /// Set the preferred UI language for a user.
    pub async fn set_preferred_language(
        pool: &PgPool,
        id: DbId,
        language: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET preferred_language = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(language)
            .fetch_optional(pool)
            .await
    }

    /// Replace a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store (or clear, with `None`) the refresh-token hash for a user.
    pub async fn set_refresh_token_hash(
        pool: &PgPool,
        id: DbId,
        token_hash: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET refresh_token_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(token_hash)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Find the user holding the given refresh-token hash.
    pub async fn find_by_refresh_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE refresh_token_hash = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Clear the refresh token wherever this hash is stored (logout).
    pub async fn clear_refresh_token_by_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET refresh_token_hash = NULL, updated_at = NOW()
             WHERE refresh_token_hash = $1",
        )
        .bind(token_hash)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Store a password-reset token hash with its expiry.
    pub async fn set_password_reset(
        pool: &PgPool,
        id: DbId,
        token_hash: &str,
        expires: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                password_reset_token_hash = $2,
                password_reset_expires = $3,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find a user by an unexpired password-reset token hash.
    pub async fn find_by_reset_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE password_reset_token_hash = $1 AND password_reset_expires > NOW()"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Set a new password hash and clear the reset-token fields in one write.
    pub async fn reset_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                password_hash = $2,
                password_reset_token_hash = NULL,
                password_reset_expires = NULL,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Promote an existing user to admin, replacing name and credentials.
    pub async fn promote_to_admin(
        pool: &PgPool,
        id: DbId,
        first_name: &str,
        last_name: &str,
        password_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                first_name = $2,
                last_name = $3,
                password_hash = $4,
                role = 'admin',
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(first_name)
            .bind(last_name)
            .bind(password_hash)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite a user's subscription tier and income (webhook path).
    ///
    /// A plain overwrite, so webhook replays are harmless.
    pub async fn update_subscription(
        pool: &PgPool,
        id: DbId,
        subscription_type: &str,
        income: f64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET subscription_type = $2, income = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(subscription_type)
        .bind(income)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a user. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
