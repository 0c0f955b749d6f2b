use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::Role;

/// Body of the password change function.
/// Both fields are optional at the serde level so that a missing field is
/// reported through validation with the same message as a short password.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(required, length(min = 1))]
    pub user_id: Option<String>,
    #[validate(required, length(min = 8))]
    #[schema(example = "n3w-s3cret")]
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChangePasswordResponse {
    pub success: bool,
}

/// The fields of a user needed to authorize a password change
#[derive(Debug, Clone, FromRow)]
pub struct UserAccount {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub role: Role,
}
