//! Handlers for the `/section` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fableloom_core::error::CoreError;
use fableloom_core::types::DbId;
use fableloom_db::models::section::{CreateSection, Section, SectionWithCount, UpdateSection};
use fableloom_db::repositories::SectionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/section
pub async fn create_section(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSection>,
) -> AppResult<impl IntoResponse> {
    if input.name_en.trim().is_empty() || input.name_es.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Section name is required in both languages".into(),
        ));
    }

    let section = SectionRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: section })))
}

/// GET /api/section
///
/// List all sections with their live question counts.
pub async fn list_sections(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SectionWithCount>>>> {
    let sections = SectionRepo::list_with_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: sections }))
}

/// PUT /api/section/{id}
pub async fn update_section(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(section_id): Path<DbId>,
    Json(input): Json<UpdateSection>,
) -> AppResult<Json<DataResponse<Section>>> {
    let section = SectionRepo::update(&state.pool, section_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Section",
            id: section_id,
        }))?;

    Ok(Json(DataResponse { data: section }))
}

/// DELETE /api/section/{id}
///
/// Admin only. Deleting a section cascades to its questions.
pub async fn delete_section(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(section_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Section>>> {
    let section = SectionRepo::delete(&state.pool, section_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Section",
            id: section_id,
        }))?;

    tracing::info!(section_id, "Section deleted with its questions");

    Ok(Json(DataResponse { data: section }))
}
