//! Event and statistics queries.

use super::{Resources, EVENTS_KEY, STATISTICS_KEY};
use crate::error::Result;
use crate::models::{
    AcknowledgeEventRequest, DashboardStatistics, EquipmentEvent, EventFilterRequest,
    EventSeverity, EventType, Page, PageRequest,
};
use crate::query::QueryState;
use crate::query_key;
use std::collections::BTreeMap;
use std::time::Duration;

/// How often the unacknowledged list is refreshed while watched.
pub const UNACKNOWLEDGED_REFRESH: Duration = Duration::from_secs(30);
/// How often dashboard statistics are refreshed while watched.
pub const DASHBOARD_STATS_REFRESH: Duration = Duration::from_secs(60);
/// How often the recent-critical list is refreshed while watched.
pub const RECENT_CRITICAL_REFRESH: Duration = Duration::from_secs(30);

impl Resources {
    pub async fn events(&self, page: PageRequest) -> QueryState<Page<EquipmentEvent>> {
        let api = self.api.clone();
        self.cache
            .query(query_key![EVENTS_KEY, page.page, page.size], true, move || async move {
                api.list_events(page).await
            })
            .await
    }

    pub async fn event(&self, id: &str) -> QueryState<EquipmentEvent> {
        let api = self.api.clone();
        let id = id.to_string();
        self.cache
            .query(query_key![EVENTS_KEY, &id], !id.is_empty(), move || async move {
                api.get_event(&id).await
            })
            .await
    }

    pub async fn events_by_equipment(
        &self,
        equipment_id: &str,
        page: PageRequest,
    ) -> QueryState<Page<EquipmentEvent>> {
        let api = self.api.clone();
        let equipment_id = equipment_id.to_string();
        self.cache
            .query(
                query_key![EVENTS_KEY, "equipment", &equipment_id, page.page, page.size],
                !equipment_id.is_empty(),
                move || async move { api.events_by_equipment(&equipment_id, page).await },
            )
            .await
    }

    pub async fn events_by_farm(&self, farm_id: &str, page: PageRequest) -> QueryState<Page<EquipmentEvent>> {
        let api = self.api.clone();
        let farm_id = farm_id.to_string();
        self.cache
            .query(
                query_key![EVENTS_KEY, "farm", &farm_id, page.page, page.size],
                !farm_id.is_empty(),
                move || async move { api.events_by_farm(&farm_id, page).await },
            )
            .await
    }

    pub async fn events_by_type(
        &self,
        event_type: EventType,
        page: PageRequest,
    ) -> QueryState<Page<EquipmentEvent>> {
        let api = self.api.clone();
        let enabled = !event_type.as_str().is_empty();
        self.cache
            .query(
                query_key![EVENTS_KEY, "type", event_type.as_str(), page.page, page.size],
                enabled,
                move || async move { api.events_by_type(&event_type, page).await },
            )
            .await
    }

    pub async fn events_by_severity(
        &self,
        severity: EventSeverity,
        page: PageRequest,
    ) -> QueryState<Page<EquipmentEvent>> {
        let api = self.api.clone();
        self.cache
            .query(
                query_key![EVENTS_KEY, "severity", severity.as_str(), page.page, page.size],
                true,
                move || async move { api.events_by_severity(severity, page).await },
            )
            .await
    }

    pub async fn unacknowledged_events(&self, page: PageRequest) -> QueryState<Page<EquipmentEvent>> {
        let api = self.api.clone();
        self.cache
            .query(
                query_key![EVENTS_KEY, "unacknowledged", page.page, page.size],
                true,
                move || async move { api.unacknowledged_events(page).await },
            )
            .await
    }

    /// Disabled when the filter sets no criterion.
    pub async fn filter_events(
        &self,
        filter: &EventFilterRequest,
        page: PageRequest,
    ) -> QueryState<Page<EquipmentEvent>> {
        let api = self.api.clone();
        let enabled = !filter.is_empty();
        let encoded = serde_json::to_string(filter).unwrap_or_default();
        let filter = filter.clone();
        self.cache
            .query(
                query_key![EVENTS_KEY, "filter", encoded, page.page, page.size],
                enabled,
                move || async move { api.filter_events(&filter, page).await },
            )
            .await
    }

    pub async fn acknowledge_event(
        &self,
        id: &str,
        request: &AcknowledgeEventRequest,
    ) -> Result<EquipmentEvent> {
        let result = self.api.acknowledge_event(id, request).await;
        self.settle(
            result,
            &[
                query_key![EVENTS_KEY],
                query_key![EVENTS_KEY, id],
                query_key![STATISTICS_KEY],
            ],
            "Event acknowledged successfully",
            "Failed to acknowledge event",
        )
    }

    pub async fn dashboard_statistics(&self) -> QueryState<DashboardStatistics> {
        let api = self.api.clone();
        self.cache
            .query(query_key![STATISTICS_KEY, "dashboard"], true, move || async move {
                api.dashboard_statistics().await
            })
            .await
    }

    pub async fn event_counts_by_type(&self) -> QueryState<BTreeMap<String, u64>> {
        let api = self.api.clone();
        self.cache
            .query(query_key![STATISTICS_KEY, "by-type"], true, move || async move {
                api.event_counts_by_type().await
            })
            .await
    }

    pub async fn event_counts_by_severity(&self) -> QueryState<BTreeMap<String, u64>> {
        let api = self.api.clone();
        self.cache
            .query(query_key![STATISTICS_KEY, "by-severity"], true, move || async move {
                api.event_counts_by_severity().await
            })
            .await
    }

    pub async fn recent_critical_events(&self, limit: u32) -> QueryState<Vec<EquipmentEvent>> {
        let api = self.api.clone();
        self.cache
            .query(query_key![EVENTS_KEY, "recent-critical", limit], true, move || async move {
                api.recent_critical_events(limit).await
            })
            .await
    }
}
