use axum::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::organizations::{Organization, OrganizationUser};
use crate::passwords::UserAccount;
use crate::repository::TenantRepository;
use crate::stats::{TaskCounts, TaskStatus};

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    /// Create a new PgRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for PgRepository {
    async fn ping(&self) -> Result<(), ApiError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_active_users(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<OrganizationUser>, ApiError> {
        let users = sqlx::query_as::<_, OrganizationUser>(
            r#"
            SELECT id, name, email, role, organization_id, is_active, created_at
            FROM users
            WHERE organization_id = $1 AND is_active = TRUE
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        let organizations = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, is_active, created_at
            FROM organizations
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(organizations)
    }

    async fn count_active_users(&self, organization_id: Uuid) -> Result<i64, ApiError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE organization_id = $1 AND is_active = TRUE",
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_tasks(
        &self,
        organization_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<TaskCounts, ApiError> {
        let counts = sqlx::query_as::<_, TaskCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = $2) AS completed,
                COUNT(*) FILTER (WHERE status NOT IN ($2, $3)) AS pending,
                COUNT(*) FILTER (
                    WHERE due_date IS NOT NULL
                      AND due_date < $4
                      AND status NOT IN ($2, $3)
                ) AS overdue
            FROM tasks
            WHERE organization_id = $1
            "#,
        )
        .bind(organization_id)
        .bind(TaskStatus::Completed)
        .bind(TaskStatus::Cancelled)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn find_user_account(&self, user_id: Uuid) -> Result<Option<UserAccount>, ApiError> {
        let account = sqlx::query_as::<_, UserAccount>(
            "SELECT id, organization_id, role FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn update_password_hash(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(password_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
