// In-memory repository for handler and router tests

use axum::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use uuid::Uuid;

use crate::auth::Role;
use crate::error::ApiError;
use crate::organizations::{Organization, OrganizationUser};
use crate::passwords::UserAccount;
use crate::repository::TenantRepository;
use crate::stats::{TaskCounts, TaskStatus};

#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: OrganizationUser,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct StoredTask {
    pub organization_id: Uuid,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Tables {
    organizations: Vec<Organization>,
    users: Vec<StoredUser>,
    tasks: Vec<StoredTask>,
}

/// Repository backed by vectors behind a lock.
/// Counts every call so tests can assert the database was never touched.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
    calls: AtomicUsize,
    failing: bool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every call fails like an unreachable database
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn add_organization(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.write().unwrap().organizations.push(Organization {
            id,
            name: name.to_string(),
            is_active: true,
            created_at: Utc::now(),
        });
        id
    }

    pub fn add_user(&self, organization_id: Uuid, name: &str, role: Role, is_active: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.write().unwrap().users.push(StoredUser {
            user: OrganizationUser {
                id,
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                role,
                organization_id: Some(organization_id),
                is_active,
                created_at: Utc::now(),
            },
            password_hash: String::new(),
        });
        id
    }

    pub fn add_task(
        &self,
        organization_id: Uuid,
        status: TaskStatus,
        due_date: Option<DateTime<Utc>>,
    ) {
        self.tables.write().unwrap().tasks.push(StoredTask {
            organization_id,
            status,
            due_date,
        });
    }

    pub fn password_hash(&self, user_id: Uuid) -> Option<String> {
        self.tables
            .read()
            .unwrap()
            .users
            .iter()
            .find(|u| u.user.id == user_id)
            .map(|u| u.password_hash.clone())
    }

    fn enter(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            Err(ApiError::DatabaseError(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TenantRepository for MemoryRepository {
    async fn ping(&self) -> Result<(), ApiError> {
        self.enter()
    }

    async fn list_active_users(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<OrganizationUser>, ApiError> {
        self.enter()?;
        let mut users: Vec<OrganizationUser> = self
            .tables
            .read()
            .unwrap()
            .users
            .iter()
            .filter(|u| u.user.organization_id == Some(organization_id) && u.user.is_active)
            .map(|u| u.user.clone())
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        self.enter()?;
        let mut organizations = self.tables.read().unwrap().organizations.clone();
        organizations.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(organizations)
    }

    async fn count_active_users(&self, organization_id: Uuid) -> Result<i64, ApiError> {
        self.enter()?;
        let count = self
            .tables
            .read()
            .unwrap()
            .users
            .iter()
            .filter(|u| u.user.organization_id == Some(organization_id) && u.user.is_active)
            .count();
        Ok(count as i64)
    }

    async fn count_tasks(
        &self,
        organization_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<TaskCounts, ApiError> {
        self.enter()?;
        let tables = self.tables.read().unwrap();
        let counts = tables
            .tasks
            .iter()
            .filter(|t| t.organization_id == organization_id)
            .fold(TaskCounts::default(), |mut acc, task| {
                acc.total += 1;
                if task.status == TaskStatus::Completed {
                    acc.completed += 1;
                }
                if !task.status.is_closed() {
                    acc.pending += 1;
                }
                if !task.status.is_closed() && task.due_date.is_some_and(|due| due < now) {
                    acc.overdue += 1;
                }
                acc
            });
        Ok(counts)
    }

    async fn find_user_account(&self, user_id: Uuid) -> Result<Option<UserAccount>, ApiError> {
        self.enter()?;
        Ok(self
            .tables
            .read()
            .unwrap()
            .users
            .iter()
            .find(|u| u.user.id == user_id)
            .map(|u| UserAccount {
                id: u.user.id,
                organization_id: u.user.organization_id,
                role: u.user.role,
            }))
    }

    async fn update_password_hash(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<bool, ApiError> {
        self.enter()?;
        let mut tables = self.tables.write().unwrap();
        match tables.users.iter_mut().find(|u| u.user.id == user_id) {
            Some(stored) => {
                stored.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
