//! Aggregation queries backing the admin reports.
//!
//! Everything groups by calendar month number (1-12) the way the admin
//! dashboard charts expect.

use sqlx::PgPool;

use crate::models::report::{
    MonthlyOrderIncome, MonthlySubscriberCounts, MonthlyUserGrowth, MonthlyUserIncome,
};

/// Provides read-only reporting aggregations.
pub struct ReportRepo;

impl ReportRepo {
    /// Order income summed per month.
    pub async fn order_income_by_month(
        pool: &PgPool,
    ) -> Result<Vec<MonthlyOrderIncome>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyOrderIncome>(
            "SELECT EXTRACT(MONTH FROM created_at)::INT4 AS month,
                    COALESCE(SUM(total), 0)::FLOAT8 AS total_income
             FROM orders
             GROUP BY 1
             ORDER BY 1",
        )
        .fetch_all(pool)
        .await
    }

    /// User subscription income summed per signup month.
    pub async fn user_income_by_month(
        pool: &PgPool,
    ) -> Result<Vec<MonthlyUserIncome>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyUserIncome>(
            "SELECT EXTRACT(MONTH FROM created_at)::INT4 AS month,
                    COALESCE(SUM(income), 0)::FLOAT8 AS total_income
             FROM users
             GROUP BY 1
             ORDER BY 1",
        )
        .fetch_all(pool)
        .await
    }

    /// Premium vs. total signups per month.
    pub async fn subscriber_counts_by_month(
        pool: &PgPool,
    ) -> Result<Vec<MonthlySubscriberCounts>, sqlx::Error> {
        sqlx::query_as::<_, MonthlySubscriberCounts>(
            "SELECT EXTRACT(MONTH FROM created_at)::INT4 AS month,
                    COUNT(*) FILTER (WHERE subscription_type = 'premium') AS premium_users,
                    COUNT(*) AS total_users
             FROM users
             GROUP BY 1
             ORDER BY 1",
        )
        .fetch_all(pool)
        .await
    }

    /// New signups per month.
    pub async fn user_growth_by_month(
        pool: &PgPool,
    ) -> Result<Vec<MonthlyUserGrowth>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyUserGrowth>(
            "SELECT EXTRACT(MONTH FROM created_at)::INT4 AS month,
                    COUNT(*) AS total_users
             FROM users
             GROUP BY 1
             ORDER BY 1",
        )
        .fetch_all(pool)
        .await
    }
}
