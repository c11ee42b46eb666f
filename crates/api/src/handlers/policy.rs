//! Handlers for the single-row `/policy` resource.

use axum::extract::State;
use axum::Json;
use fableloom_core::error::CoreError;
use fableloom_db::models::policy::{Policy, UpdatePolicies};
use fableloom_db::repositories::PolicyRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/policy
pub async fn get_policies(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Policy>>> {
    let policy = PolicyRepo::get(&state.pool).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFoundMessage("Policies not found".into()))
    })?;

    Ok(Json(DataResponse { data: policy }))
}

/// PUT /api/policy
///
/// Upsert the single policy row (admin only). The first write must supply
/// both documents; later writes may update either one.
pub async fn upsert_policies(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpdatePolicies>,
) -> AppResult<Json<DataResponse<Policy>>> {
    let policy = match PolicyRepo::get(&state.pool).await? {
        Some(existing) => PolicyRepo::update(&state.pool, existing.id, &input)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Policy",
                id: existing.id,
            }))?,
        None => {
            let (Some(terms), Some(privacy)) =
                (&input.terms_and_conditions, &input.privacy_policy)
            else {
                return Err(AppError::BadRequest(
                    "Both terms_and_conditions and privacy_policy are required".into(),
                ));
            };
            PolicyRepo::create(&state.pool, terms, privacy).await?
        }
    };

    Ok(Json(DataResponse { data: policy }))
}
