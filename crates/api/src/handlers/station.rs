//! Handlers for the `/station` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fableloom_core::error::CoreError;
use fableloom_core::types::DbId;
use fableloom_db::models::station::{CreateStation, Station, UpdateStation};
use fableloom_db::repositories::StationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/station
pub async fn create_station(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateStation>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Station name is required".into()));
    }

    let station = StationRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: station })))
}

/// GET /api/station
pub async fn list_stations(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Station>>>> {
    let stations = StationRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: stations }))
}

/// GET /api/station/{id}
pub async fn get_station(
    State(state): State<AppState>,
    Path(station_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Station>>> {
    let station = StationRepo::find_by_id(&state.pool, station_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Station",
            id: station_id,
        }))?;

    Ok(Json(DataResponse { data: station }))
}

/// PUT /api/station/{id}
pub async fn update_station(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(station_id): Path<DbId>,
    Json(input): Json<UpdateStation>,
) -> AppResult<Json<DataResponse<Station>>> {
    let station = StationRepo::update(&state.pool, station_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Station",
            id: station_id,
        }))?;

    Ok(Json(DataResponse { data: station }))
}
