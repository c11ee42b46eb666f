//! Wallet entity model. The transaction history is an append-only JSONB log
//! owned by the wallet row.

use fableloom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Transaction kind for funds added to a wallet.
pub const TRANSACTION_CREDIT: &str = "credit";

/// Transaction kind for funds spent from a wallet.
pub const TRANSACTION_DEBIT: &str = "debit";

/// One entry in a wallet's transaction log.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WalletTransaction {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub at: Timestamp,
}

/// Full wallet row from the `wallets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Wallet {
    pub id: DbId,
    pub user_id: DbId,
    pub balance: f64,
    pub transactions: Json<Vec<WalletTransaction>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
