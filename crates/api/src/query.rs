//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Optional `?status=` filter used by coupon and chat listings.
#[derive(Debug, Deserialize)]
pub struct StatusFilterParams {
    pub status: Option<String>,
}
