//! Upcoming maintenance timeline.

use crate::models::{MaintenanceSchedule, MaintenanceStatus};
use crate::query::QueryState;
use crate::query_key;
use crate::resources::{Resources, MAINTENANCE_KEY};
use crate::views::format::parse_timestamp;

/// Entries that are not completed, earliest first. Undated entries go last.
pub fn upcoming_maintenance(schedule: &[MaintenanceSchedule]) -> Vec<MaintenanceSchedule> {
    let mut upcoming: Vec<MaintenanceSchedule> = schedule
        .iter()
        .filter(|item| item.status != MaintenanceStatus::Completed)
        .cloned()
        .collect();
    upcoming.sort_by_cached_key(|item| {
        let date = parse_timestamp(&item.scheduled_date);
        (date.is_none(), date)
    });
    upcoming
}

impl Resources {
    /// The maintenance schedule, cached under its own key and narrowed to
    /// upcoming work.
    pub async fn upcoming_maintenance(&self) -> QueryState<Vec<MaintenanceSchedule>> {
        let api = self.api().clone();
        self.cache()
            .query(query_key![MAINTENANCE_KEY, "upcoming"], true, move || async move {
                api.maintenance_schedule().await
            })
            .await
            .map(|schedule| upcoming_maintenance(&schedule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, date: &str, status: MaintenanceStatus) -> MaintenanceSchedule {
        MaintenanceSchedule {
            equipment_id: id.into(),
            scheduled_date: date.into(),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_completed_dropped_and_sorted() {
        let schedule = vec![
            entry("a", "2024-07-01", MaintenanceStatus::Scheduled),
            entry("b", "2024-05-01", MaintenanceStatus::Completed),
            entry("c", "", MaintenanceStatus::Scheduled),
            entry("d", "2024-06-01T09:00:00", MaintenanceStatus::Overdue),
        ];
        let ids: Vec<String> = upcoming_maintenance(&schedule)
            .into_iter()
            .map(|item| item.equipment_id)
            .collect();
        assert_eq!(ids, vec!["d", "a", "c"]);
    }
}
