//! Repository for the single-row `policies` table.

use sqlx::PgPool;

use crate::models::policy::{Policy, UpdatePolicies};

const COLUMNS: &str = "id, terms_and_conditions, privacy_policy, created_at, updated_at";

/// Provides access to the platform's policy document.
pub struct PolicyRepo;

impl PolicyRepo {
    /// Fetch the policy row, if one has been created.
    pub async fn get(pool: &PgPool) -> Result<Option<Policy>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM policies ORDER BY id LIMIT 1");
        sqlx::query_as::<_, Policy>(&query).fetch_optional(pool).await
    }

    /// Create the policy row with both documents.
    pub async fn create(
        pool: &PgPool,
        terms_and_conditions: &str,
        privacy_policy: &str,
    ) -> Result<Policy, sqlx::Error> {
        let query = format!(
            "INSERT INTO policies (terms_and_conditions, privacy_policy)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Policy>(&query)
            .bind(terms_and_conditions)
            .bind(privacy_policy)
            .fetch_one(pool)
            .await
    }

    /// Update the existing policy row; omitted fields keep their value.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        input: &UpdatePolicies,
    ) -> Result<Option<Policy>, sqlx::Error> {
        let query = format!(
            "UPDATE policies SET
                terms_and_conditions = COALESCE($2, terms_and_conditions),
                privacy_policy = COALESCE($3, privacy_policy),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Policy>(&query)
            .bind(id)
            .bind(&input.terms_and_conditions)
            .bind(&input.privacy_policy)
            .fetch_optional(pool)
            .await
    }
}
