use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Task lifecycle status as stored in `tasks.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Completed and cancelled tasks can no longer become overdue
    pub fn is_closed(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }
}

/// Raw task counts for one organization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct TaskCounts {
    pub total: i64,
    pub completed: i64,
    /// Tasks neither completed nor cancelled
    pub pending: i64,
    /// Open tasks whose due date is in the past
    pub overdue: i64,
}

/// Statistics for a single organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationStats {
    pub organization_id: Uuid,
    pub name: String,
    pub total_users: i64,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub overdue_tasks: i64,
    /// Percentage of completed tasks, rounded to the nearest integer
    #[schema(example = 60)]
    pub completion_rate: i64,
}

/// Aggregate over every organization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_organizations: i64,
    pub total_users: i64,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub overdue_tasks: i64,
    pub completion_rate: i64,
}

/// Response body of GET /stats/organizations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub global: GlobalStats,
    pub organizations: Vec<OrganizationStats>,
    pub generated_at: DateTime<Utc>,
}
