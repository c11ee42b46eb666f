//! Policy document model (single upserted row).

use fableloom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single policies row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Policy {
    pub id: DbId,
    pub terms_and_conditions: String,
    pub privacy_policy: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for upserting policies. Omitted fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdatePolicies {
    pub terms_and_conditions: Option<String>,
    pub privacy_policy: Option<String>,
}
