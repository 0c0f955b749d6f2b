use chrono::{DateTime, Utc};

use crate::error::ApiError;
use crate::repository::TenantRepository;
use crate::stats::{StatsCalculator, StatsResponse};

/// Collect statistics for every organization.
///
/// The queries run one after another without a transaction, so the result is
/// a best-effort snapshot rather than a consistent read.
pub async fn collect_organization_stats(
    repository: &dyn TenantRepository,
    now: DateTime<Utc>,
) -> Result<StatsResponse, ApiError> {
    let organizations = repository.list_organizations().await?;
    tracing::debug!("Computing statistics for {} organizations", organizations.len());

    let mut per_organization = Vec::with_capacity(organizations.len());
    for organization in organizations {
        let total_users = repository.count_active_users(organization.id).await?;
        let counts = repository.count_tasks(organization.id, now).await?;
        per_organization.push(StatsCalculator::organization(
            organization.id,
            organization.name,
            total_users,
            counts,
        ));
    }

    let global = StatsCalculator::global(&per_organization);

    Ok(StatsResponse {
        global,
        organizations: per_organization,
        generated_at: now,
    })
}
