// Privileged password change function

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{guard::evaluate, require_role, PasswordService, Principal, Role};
use crate::error::ApiError;
use crate::passwords::{ChangePasswordRequest, ChangePasswordResponse};
use crate::AppState;

/// Roles allowed to reset another user's password
pub const PASSWORD_ADMIN_ROLES: [Role; 2] = [Role::Admin, Role::Franqueado];

pub const INVALID_INPUT_MESSAGE: &str = "Invalid input. Password must be at least 8 characters.";

fn invalid_input() -> ApiError {
    ApiError::ValidationError(INVALID_INPUT_MESSAGE.to_string())
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User".to_string())
}

/// Handler for POST /functions/v1/change-user-password
/// Sets a new password for a user of the caller's organization
#[utoipa::path(
    post,
    path = "/functions/v1/change-user-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ChangePasswordResponse),
        (status = 400, description = "Invalid input", body = String, example = json!({"error": "Invalid input. Password must be at least 8 characters."})),
        (status = 401, description = "Missing or invalid token", body = String, example = json!({"error": "Invalid or expired token"})),
        (status = 403, description = "Caller role not permitted, or target is a global account", body = String, example = json!({"error": "Insufficient permissions"})),
        (status = 404, description = "Target user not found in the caller's organization", body = String, example = json!({"error": "User not found"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Internal server error", "message": "A database error occurred"}))
    ),
    tag = "passwords"
)]
pub async fn change_user_password(
    State(state): State<AppState>,
    principal: Principal,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<ChangePasswordResponse>, ApiError> {
    require_role(&principal, &PASSWORD_ADMIN_ROLES)?;

    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected password change body: {}", rejection);
        invalid_input()
    })?;
    request.validate().map_err(|_| invalid_input())?;

    let (Some(raw_user_id), Some(new_password)) = (request.user_id, request.new_password) else {
        return Err(invalid_input());
    };
    let user_id = Uuid::parse_str(raw_user_id.trim()).map_err(|_| invalid_input())?;

    let account = state
        .repository
        .find_user_account(user_id)
        .await?
        .ok_or_else(user_not_found)?;

    // Users outside the caller's organization look exactly like unknown ids
    let in_scope = account
        .organization_id
        .is_some_and(|organization_id| evaluate(&principal, organization_id).is_allowed());
    if !in_scope {
        tracing::warn!(
            "Password change for user {} outside organization {:?} refused (caller {})",
            account.id,
            principal.organization_id,
            principal.user_id
        );
        return Err(user_not_found());
    }

    // Global accounts are never managed by a local administrator
    if account.role.has_global_access() {
        tracing::warn!(
            "Password change for {} user {} refused (caller {} {})",
            account.role,
            account.id,
            principal.role,
            principal.user_id
        );
        return Err(ApiError::InsufficientPermissions);
    }

    // Argon2 is CPU-bound; keep it off the async workers
    let password_hash =
        tokio::task::spawn_blocking(move || PasswordService::hash_password(&new_password))
            .await
            .map_err(|e| ApiError::InternalError(format!("hashing task failed: {}", e)))??;
    if !state
        .repository
        .update_password_hash(account.id, &password_hash)
        .await?
    {
        return Err(user_not_found());
    }

    tracing::info!(
        "Password changed for user {} by user {} ({})",
        account.id,
        principal.user_id,
        principal.role
    );
    Ok(Json(ChangePasswordResponse { success: true }))
}
