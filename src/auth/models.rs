// Authentication data models: roles, principals and authorization decisions

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Permission tier of a user
///
/// Stored as snake_case text in the `users.role` column and in token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    FranchiseAdmin,
    Admin,
    Franqueado,
    User,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::SuperAdmin,
        Role::FranchiseAdmin,
        Role::Admin,
        Role::Franqueado,
        Role::User,
    ];

    /// Whether this role may act on organizations other than its own
    pub const fn has_global_access(self) -> bool {
        match self {
            Role::SuperAdmin | Role::FranchiseAdmin => true,
            Role::Admin | Role::Franqueado | Role::User => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::FranchiseAdmin => "franchise_admin",
            Role::Admin => "admin",
            Role::Franqueado => "franqueado",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("Invalid role: {}", s))
    }
}

/// The authenticated caller, derived once per request from verified claims
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
    /// Home organization; global roles may have none
    pub organization_id: Option<Uuid>,
}

/// Why the guard refused a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    ForeignOrganization,
    NoHomeOrganization,
    RoleNotPermitted,
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            DenyReason::ForeignOrganization => "target organization is not the caller's",
            DenyReason::NoHomeOrganization => "caller has no home organization",
            DenyReason::RoleNotPermitted => "role is not permitted for this operation",
        };
        f.write_str(text)
    }
}

/// Outcome of evaluating a principal against a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Allow,
    Deny(DenyReason),
}

impl AuthorizationDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorizationDecision::Allow)
    }
}
