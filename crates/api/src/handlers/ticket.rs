//! Handlers for the `/ticket` resource.
//!
//! Purchasing debits the buyer's wallet through a conditional update, so a
//! ticket only exists once the fare has actually been taken; two concurrent
//! purchases can never overdraw the same wallet.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fableloom_core::error::CoreError;
use fableloom_db::models::ticket::{PurchaseTicket, Ticket};
use fableloom_db::repositories::{StationRepo, TicketRepo, TrainRepo, WalletRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/ticket/purchase
pub async fn purchase_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PurchaseTicket>,
) -> AppResult<impl IntoResponse> {
    if input.fare <= 0.0 {
        return Err(AppError::BadRequest("Fare must be greater than zero".into()));
    }
    if input.from_station_id == input.to_station_id {
        return Err(AppError::BadRequest(
            "Origin and destination stations must differ".into(),
        ));
    }

    TrainRepo::find_by_id(&state.pool, input.train_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Train",
            id: input.train_id,
        }))?;

    for station_id in [input.from_station_id, input.to_station_id] {
        StationRepo::find_by_id(&state.pool, station_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Station",
                id: station_id,
            }))?;
    }

    let wallet = WalletRepo::debit(&state.pool, auth.user.id, input.fare)
        .await?
        .ok_or_else(|| AppError::BadRequest("Insufficient wallet balance".into()))?;

    let ticket = TicketRepo::create(&state.pool, auth.user.id, &input).await?;

    tracing::info!(
        ticket_id = ticket.id,
        user_id = auth.user.id,
        fare = input.fare,
        balance = wallet.balance,
        "Ticket purchased"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Ticket purchased successfully",
            "data": ticket,
            "balance": wallet.balance,
        })),
    ))
}

/// GET /api/ticket/my-tickets
pub async fn list_my_tickets(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Ticket>>>> {
    let tickets = TicketRepo::list_for_user(&state.pool, auth.user.id).await?;
    Ok(Json(DataResponse { data: tickets }))
}
