//! Repository for the `coupons` table.

use fableloom_core::types::DbId;
use sqlx::PgPool;

use crate::models::coupon::{Coupon, CreateCoupon, UpdateCoupon};

const COLUMNS: &str = "id, name, code, discount, start_date, end_date, status, \
                        created_at, updated_at";

/// Provides CRUD operations for coupons.
pub struct CouponRepo;

impl CouponRepo {
    /// Insert a new coupon. A duplicate code violates `uq_coupons_code`.
    pub async fn create(pool: &PgPool, input: &CreateCoupon) -> Result<Coupon, sqlx::Error> {
        let query = format!(
            "INSERT INTO coupons (name, code, discount, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(&input.name)
            .bind(&input.code)
            .bind(input.discount)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// Find a coupon by its code.
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coupons WHERE code = $1");
        sqlx::query_as::<_, Coupon>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List coupons newest first, optionally filtered by status.
    pub async fn list(pool: &PgPool, status: Option<&str>) -> Result<Vec<Coupon>, sqlx::Error> {
        match status {
            Some(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM coupons WHERE status = $1 ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, Coupon>(&query)
                    .bind(status)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!("SELECT {COLUMNS} FROM coupons ORDER BY created_at DESC");
                sqlx::query_as::<_, Coupon>(&query).fetch_all(pool).await
            }
        }
    }

    /// Update a coupon. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCoupon,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!(
            "UPDATE coupons SET
                name = COALESCE($2, name),
                code = COALESCE($3, code),
                discount = COALESCE($4, discount),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                status = COALESCE($7, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.code)
            .bind(input.discount)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a coupon, returning the deleted row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!("DELETE FROM coupons WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Coupon>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
