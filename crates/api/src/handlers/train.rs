//! Handlers for the `/train` resource. A train owns its ordered stop list;
//! each stop references a station by id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fableloom_core::error::CoreError;
use fableloom_core::types::DbId;
use fableloom_db::models::train::{CreateTrain, Train, UpdateTrain};
use fableloom_db::repositories::{StationRepo, TrainRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/train
pub async fn create_train(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTrain>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Train name is required".into()));
    }

    for stop in &input.stops {
        StationRepo::find_by_id(&state.pool, stop.station_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Station",
                id: stop.station_id,
            }))?;
    }

    let train = TrainRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: train })))
}

/// GET /api/train
pub async fn list_trains(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Train>>>> {
    let trains = TrainRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: trains }))
}

/// GET /api/train/{id}
pub async fn get_train(
    State(state): State<AppState>,
    Path(train_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Train>>> {
    let train = TrainRepo::find_by_id(&state.pool, train_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Train",
            id: train_id,
        }))?;

    Ok(Json(DataResponse { data: train }))
}

/// PUT /api/train/{id}
pub async fn update_train(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(train_id): Path<DbId>,
    Json(input): Json<UpdateTrain>,
) -> AppResult<Json<DataResponse<Train>>> {
    if let Some(stops) = &input.stops {
        for stop in stops {
            StationRepo::find_by_id(&state.pool, stop.station_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Station",
                    id: stop.station_id,
                }))?;
        }
    }

    let train = TrainRepo::update(&state.pool, train_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Train",
            id: train_id,
        }))?;

    Ok(Json(DataResponse { data: train }))
}
