use uuid::Uuid;

use crate::stats::{GlobalStats, OrganizationStats, TaskCounts};

/// Calculator turning raw counts into organization and global statistics
pub struct StatsCalculator;

impl StatsCalculator {
    /// Percentage of completed tasks rounded half away from zero.
    /// An organization without tasks has a rate of 0.
    pub fn completion_rate(completed: i64, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        let completed = completed.clamp(0, total);
        (completed as f64 / total as f64 * 100.0).round() as i64
    }

    /// Build the statistics for one organization
    pub fn organization(
        organization_id: Uuid,
        name: String,
        total_users: i64,
        counts: TaskCounts,
    ) -> OrganizationStats {
        OrganizationStats {
            organization_id,
            name,
            total_users,
            total_tasks: counts.total,
            completed_tasks: counts.completed,
            pending_tasks: counts.pending,
            overdue_tasks: counts.overdue,
            completion_rate: Self::completion_rate(counts.completed, counts.total),
        }
    }

    /// Sum per-organization statistics into the global view.
    /// The global rate comes from the summed counts, not an average of rates.
    pub fn global(organizations: &[OrganizationStats]) -> GlobalStats {
        let mut global = organizations.iter().fold(GlobalStats::default(), |mut acc, org| {
            acc.total_users += org.total_users;
            acc.total_tasks += org.total_tasks;
            acc.completed_tasks += org.completed_tasks;
            acc.pending_tasks += org.pending_tasks;
            acc.overdue_tasks += org.overdue_tasks;
            acc
        });
        global.total_organizations = organizations.len() as i64;
        global.completion_rate =
            Self::completion_rate(global.completed_tasks, global.total_tasks);
        global
    }
}
