// HTTP handler for cross-organization statistics

use axum::{extract::State, Json};
use chrono::Utc;

use crate::auth::{authorize_global, Principal};
use crate::error::ApiError;
use crate::stats::{service, StatsResponse};
use crate::AppState;

/// Handler for GET /stats/organizations
/// Global and per-organization task statistics (super_admin / franchise_admin)
#[utoipa::path(
    get,
    path = "/stats/organizations",
    responses(
        (status = 200, description = "Global and per-organization statistics", body = StatsResponse),
        (status = 401, description = "Missing or invalid token", body = String, example = json!({"error": "Invalid or expired token"})),
        (status = 403, description = "Caller is not a global administrator", body = String, example = json!({"error": "Insufficient permissions"})),
        (status = 405, description = "Method not allowed", body = String, example = json!({"error": "Method not allowed"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Internal server error", "message": "A database error occurred"}))
    ),
    tag = "stats"
)]
pub async fn organization_stats(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<StatsResponse>, ApiError> {
    authorize_global(&principal)?;

    let stats = service::collect_organization_stats(state.repository.as_ref(), Utc::now()).await?;

    tracing::debug!(
        "Returning statistics for {} organizations to user_id={}",
        stats.organizations.len(),
        principal.user_id
    );
    Ok(Json(stats))
}
