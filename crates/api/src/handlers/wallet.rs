//! Handlers for the `/wallet` resource.

use axum::extract::State;
use axum::Json;
use fableloom_core::error::CoreError;
use fableloom_db::models::wallet::Wallet;
use fableloom_db::repositories::WalletRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /wallet/add`.
#[derive(Debug, Deserialize)]
pub struct AddFundsRequest {
    pub amount: f64,
}

/// POST /api/wallet/add
///
/// Credit the authenticated user's wallet, creating it on first use. The
/// credit and its transaction-log entry land in a single statement.
pub async fn add_funds(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AddFundsRequest>,
) -> AppResult<Json<DataResponse<Wallet>>> {
    if input.amount <= 0.0 {
        return Err(AppError::BadRequest(
            "Amount must be greater than zero".into(),
        ));
    }

    let wallet = WalletRepo::credit(&state.pool, auth.user.id, input.amount).await?;

    tracing::info!(
        user_id = auth.user.id,
        amount = input.amount,
        balance = wallet.balance,
        "Wallet credited"
    );

    Ok(Json(DataResponse { data: wallet }))
}

/// GET /api/wallet
///
/// Balance and transaction log; 404 until the first credit creates it.
pub async fn get_wallet(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Wallet>>> {
    let wallet = WalletRepo::find_for_user(&state.pool, auth.user.id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundMessage("Wallet not found".into()))
        })?;

    Ok(Json(DataResponse { data: wallet }))
}
