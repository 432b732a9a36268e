//! Supervision endpoints: events and statistics.

use crate::api::{segment, ApiClient};
use crate::error::Result;
use crate::models::{
    AcknowledgeEventRequest, DashboardStatistics, EquipmentEvent, EventFilterRequest,
    EventSeverity, EventType, Page, PageRequest,
};
use std::collections::BTreeMap;

impl ApiClient {
    pub async fn list_events(&self, page: PageRequest) -> Result<Page<EquipmentEvent>> {
        self.get("/api/events", &page.query()).await
    }

    pub async fn get_event(&self, id: &str) -> Result<EquipmentEvent> {
        self.get(&format!("/api/events/{}", segment(id)), &[]).await
    }

    pub async fn events_by_equipment(
        &self,
        equipment_id: &str,
        page: PageRequest,
    ) -> Result<Page<EquipmentEvent>> {
        self.get(&format!("/api/events/equipment/{}", segment(equipment_id)), &page.query())
            .await
    }

    pub async fn events_by_farm(&self, farm_id: &str, page: PageRequest) -> Result<Page<EquipmentEvent>> {
        self.get(&format!("/api/events/farm/{}", segment(farm_id)), &page.query())
            .await
    }

    pub async fn events_by_type(
        &self,
        event_type: &EventType,
        page: PageRequest,
    ) -> Result<Page<EquipmentEvent>> {
        self.get(&format!("/api/events/type/{}", event_type), &page.query())
            .await
    }

    pub async fn events_by_severity(
        &self,
        severity: EventSeverity,
        page: PageRequest,
    ) -> Result<Page<EquipmentEvent>> {
        self.get(&format!("/api/events/severity/{}", severity), &page.query())
            .await
    }

    pub async fn unacknowledged_events(&self, page: PageRequest) -> Result<Page<EquipmentEvent>> {
        self.get("/api/events/unacknowledged", &page.query()).await
    }

    pub async fn filter_events(
        &self,
        filter: &EventFilterRequest,
        page: PageRequest,
    ) -> Result<Page<EquipmentEvent>> {
        self.post("/api/events/filter", &page.query(), filter).await
    }

    pub async fn acknowledge_event(
        &self,
        id: &str,
        request: &AcknowledgeEventRequest,
    ) -> Result<EquipmentEvent> {
        self.post(&format!("/api/events/{}/acknowledge", segment(id)), &[], request)
            .await
    }

    pub async fn recent_critical_events(&self, limit: u32) -> Result<Vec<EquipmentEvent>> {
        self.get("/api/events/recent-critical", &[("limit", limit.to_string())])
            .await
    }

    pub async fn dashboard_statistics(&self) -> Result<DashboardStatistics> {
        self.get("/api/statistics/dashboard", &[]).await
    }

    pub async fn event_counts_by_type(&self) -> Result<BTreeMap<String, u64>> {
        self.get("/api/statistics/events/by-type", &[]).await
    }

    pub async fn event_counts_by_severity(&self) -> Result<BTreeMap<String, u64>> {
        self.get("/api/statistics/events/by-severity", &[]).await
    }
}
