//! Repository for the `subscription_plans` table.
//!
//! `discounted_price` is derived from `price` and `discount` via
//! [`fableloom_core::pricing::discounted_price`] on every create and update,
//! so the stored value can never drift from its inputs.

use fableloom_core::pricing::discounted_price;
use fableloom_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::subscription_plan::{
    CreateSubscriptionPlan, SubscriptionPlan, UpdateSubscriptionPlan,
};

const COLUMNS: &str = "id, title, description, price, discount, discounted_price, benefits, \
                        start_date, end_date, status, created_at, updated_at";

/// Provides CRUD operations for subscription plans.
pub struct SubscriptionPlanRepo;

impl SubscriptionPlanRepo {
    /// Insert a new plan, computing its discounted price.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubscriptionPlan,
    ) -> Result<SubscriptionPlan, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscription_plans
                 (title, description, price, discount, discounted_price, benefits,
                  start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.discount)
            .bind(discounted_price(input.price, input.discount))
            .bind(Json(&input.benefits))
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// Find a plan by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SubscriptionPlan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscription_plans WHERE id = $1");
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all plans, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<SubscriptionPlan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscription_plans ORDER BY created_at DESC");
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a plan, recomputing the discounted price from the resolved
    /// price and discount. Returns `None` if the id does not resolve.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubscriptionPlan,
    ) -> Result<Option<SubscriptionPlan>, sqlx::Error> {
        let Some(current) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let price = input.price.unwrap_or(current.price);
        let discount = input.discount.unwrap_or(current.discount);

        let query = format!(
            "UPDATE subscription_plans SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                price = $4,
                discount = $5,
                discounted_price = $6,
                benefits = COALESCE($7, benefits),
                start_date = COALESCE($8, start_date),
                end_date = COALESCE($9, end_date),
                status = COALESCE($10, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(price)
            .bind(discount)
            .bind(discounted_price(price, discount))
            .bind(input.benefits.as_ref().map(Json))
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a plan. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subscription_plans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
