//! Subscription plan catalog model and DTOs.

use fableloom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Full subscription plan row from the `subscription_plans` table.
///
/// `discounted_price` is recomputed from `price` and `discount` on every
/// create and update, never accepted from clients.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubscriptionPlan {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount: f64,
    pub discounted_price: f64,
    pub benefits: Json<Vec<String>>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a plan.
#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionPlan {
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

/// DTO for updating a plan. Only non-`None` fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateSubscriptionPlan {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub benefits: Option<Vec<String>>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub status: Option<String>,
}
