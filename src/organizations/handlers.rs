// HTTP handlers for organization endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::auth::{authorize, Principal};
use crate::error::ApiError;
use crate::organizations::OrganizationUser;
use crate::AppState;

/// Handler for GET /organizations/{id}/users
/// Lists the active users of an organization, sorted by name
#[utoipa::path(
    get,
    path = "/organizations/{id}/users",
    params(
        ("id" = String, Path, description = "Organization ID (UUID)")
    ),
    responses(
        (status = 200, description = "Active users sorted by name", body = Vec<OrganizationUser>),
        (status = 400, description = "Malformed organization id", body = String, example = json!({"error": "Invalid organization id"})),
        (status = 401, description = "Missing or invalid token", body = String, example = json!({"error": "Invalid or expired token"})),
        (status = 403, description = "Organization outside the caller's scope", body = String, example = json!({"error": "Insufficient permissions"})),
        (status = 405, description = "Method not allowed", body = String, example = json!({"error": "Method not allowed"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Internal server error", "message": "A database error occurred"}))
    ),
    tag = "organizations"
)]
pub async fn list_organization_users(
    State(state): State<AppState>,
    principal: Principal,
    Path(organization_id): Path<String>,
) -> Result<Json<Vec<OrganizationUser>>, ApiError> {
    let organization_id = authorize(&principal, &organization_id)?;

    let users = state.repository.list_active_users(organization_id).await?;

    tracing::debug!(
        "Retrieved {} active users for organization {}",
        users.len(),
        organization_id
    );
    Ok(Json(users))
}
