// Data access seam
//
// Handlers depend on `TenantRepository` through `AppState`; the production
// implementation wraps the long-lived PgPool created at startup.

use axum::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ApiError;
use crate::organizations::{Organization, OrganizationUser};
use crate::passwords::UserAccount;
use crate::stats::TaskCounts;

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgRepository;

#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Round-trip to the database, used by the health check
    async fn ping(&self) -> Result<(), ApiError>;

    /// Active users of an organization sorted by name
    async fn list_active_users(&self, organization_id: Uuid)
        -> Result<Vec<OrganizationUser>, ApiError>;

    /// Every organization, sorted by name
    async fn list_organizations(&self) -> Result<Vec<Organization>, ApiError>;

    async fn count_active_users(&self, organization_id: Uuid) -> Result<i64, ApiError>;

    /// Task counts for an organization; `now` decides what is overdue
    async fn count_tasks(
        &self,
        organization_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<TaskCounts, ApiError>;

    async fn find_user_account(&self, user_id: Uuid) -> Result<Option<UserAccount>, ApiError>;

    /// Returns false when no row was updated
    async fn update_password_hash(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<bool, ApiError>;
}
