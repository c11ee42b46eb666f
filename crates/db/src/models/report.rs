//! Row types for the admin reporting queries (grouped by calendar month).

use serde::Serialize;
use sqlx::FromRow;

/// Order income summed per month (1-12).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyOrderIncome {
    pub month: i32,
    pub total_income: f64,
}

/// User subscription income summed per signup month.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyUserIncome {
    pub month: i32,
    pub total_income: f64,
}

/// Premium vs. total signups per month, for subscriber-growth reporting.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlySubscriberCounts {
    pub month: i32,
    pub premium_users: i64,
    pub total_users: i64,
}

/// New signups per month.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyUserGrowth {
    pub month: i32,
    pub total_users: i64,
}
