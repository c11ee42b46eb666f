//! Repository for the `wallets` table.
//!
//! Credits and debits each land in a single statement that moves the balance
//! and appends the matching transaction-log entry together. The debit is a
//! conditional update (`balance >= amount`), so two concurrent purchases can
//! never overdraw a wallet.

use chrono::Utc;
use fableloom_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::wallet::{Wallet, WalletTransaction, TRANSACTION_CREDIT, TRANSACTION_DEBIT};

const COLUMNS: &str = "id, user_id, balance, transactions, created_at, updated_at";

/// Provides balance and transaction-log operations for wallets.
pub struct WalletRepo;

impl WalletRepo {
    /// Fetch a user's wallet.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Wallet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wallets WHERE user_id = $1");
        sqlx::query_as::<_, Wallet>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Add funds, creating the wallet on first use.
    pub async fn credit(
        pool: &PgPool,
        user_id: DbId,
        amount: f64,
    ) -> Result<Wallet, sqlx::Error> {
        let entry = vec![WalletTransaction {
            kind: TRANSACTION_CREDIT.to_string(),
            amount,
            at: Utc::now(),
        }];

        let query = format!(
            "INSERT INTO wallets (user_id, balance, transactions)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO UPDATE SET
                balance = wallets.balance + EXCLUDED.balance,
                transactions = wallets.transactions || EXCLUDED.transactions,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wallet>(&query)
            .bind(user_id)
            .bind(amount)
            .bind(Json(&entry))
            .fetch_one(pool)
            .await
    }

    /// Debit `amount` if and only if the balance covers it.
    ///
    /// Returns `None` when the wallet does not exist or the balance is
    /// insufficient; the conditional `WHERE` makes the check-and-debit
    /// atomic against concurrent purchases.
    pub async fn debit(
        pool: &PgPool,
        user_id: DbId,
        amount: f64,
    ) -> Result<Option<Wallet>, sqlx::Error> {
        let entry = vec![WalletTransaction {
            kind: TRANSACTION_DEBIT.to_string(),
            amount,
            at: Utc::now(),
        }];

        let query = format!(
            "UPDATE wallets SET
                balance = balance - $2,
                transactions = transactions || $3,
                updated_at = NOW()
             WHERE user_id = $1 AND balance >= $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wallet>(&query)
            .bind(user_id)
            .bind(amount)
            .bind(Json(&entry))
            .fetch_optional(pool)
            .await
    }
}
