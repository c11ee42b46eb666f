//! Admin reporting endpoints backed by monthly SQL aggregations.

use axum::extract::State;
use axum::Json;
use fableloom_db::repositories::ReportRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/report/income-report
///
/// Order income and subscription income, each summed per month.
pub async fn income_report(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let order_income = ReportRepo::order_income_by_month(&state.pool).await?;
    let user_income = ReportRepo::user_income_by_month(&state.pool).await?;

    Ok(Json(serde_json::json!({
        "data": {
            "order_income": order_income,
            "user_income": user_income,
        }
    })))
}

/// GET /api/report/subscriber-growth
pub async fn subscriber_growth(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let counts = ReportRepo::subscriber_counts_by_month(&state.pool).await?;
    Ok(Json(serde_json::json!({ "data": counts })))
}

/// GET /api/report/user-growth
pub async fn user_growth(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let growth = ReportRepo::user_growth_by_month(&state.pool).await?;
    Ok(Json(serde_json::json!({ "data": growth })))
}
