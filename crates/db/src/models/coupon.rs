//! Coupon entity model and DTOs.

use fableloom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full coupon row from the `coupons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Coupon {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub discount: f64,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a coupon.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCoupon {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub code: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: f64,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

/// DTO for updating a coupon. Only non-`None` fields are applied.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCoupon {
    pub name: Option<String>,
    pub code: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: Option<f64>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub status: Option<String>,
}
