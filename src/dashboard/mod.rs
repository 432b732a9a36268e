//! Client-side dashboard aggregations.
//!
//! The backend serves raw pages; the overview cards, status chart and alert
//! panel are computed here from one large page of each resource. A resource
//! that failed to load counts as empty, so one bad endpoint degrades the
//! dashboard instead of blanking it.

pub mod alerts;
pub mod maintenance;
pub mod stats;

use crate::models::{ConnectedPump, ConnectedSensor, EquipmentEvent, Farmer, Page, PageRequest};
use crate::resources::Resources;
use chrono::Utc;
use tracing::debug;

// Re-export commonly used items
pub use alerts::{active_alerts, Alert, AlertKind, AlertSeverity};
pub use maintenance::upcoming_maintenance;
pub use stats::{OverviewStats, StatusDistribution};

/// Page used for farmers, pumps and sensors on the dashboard.
pub const OVERVIEW_PAGE: PageRequest = PageRequest {
    page: 0,
    size: 1000,
};

/// Page used for events on the dashboard.
pub const OVERVIEW_EVENTS_PAGE: PageRequest = PageRequest { page: 0, size: 100 };

/// The raw pages the dashboard is computed from.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub farmers: Option<Page<Farmer>>,
    pub pumps: Option<Page<ConnectedPump>>,
    pub sensors: Option<Page<ConnectedSensor>>,
    pub events: Option<Page<EquipmentEvent>>,
}

impl DashboardData {
    pub fn farmers(&self) -> &[Farmer] {
        self.farmers.as_ref().map_or(&[], |p| p.content.as_slice())
    }

    pub fn pumps(&self) -> &[ConnectedPump] {
        self.pumps.as_ref().map_or(&[], |p| p.content.as_slice())
    }

    pub fn sensors(&self) -> &[ConnectedSensor] {
        self.sensors.as_ref().map_or(&[], |p| p.content.as_slice())
    }

    pub fn events(&self) -> &[EquipmentEvent] {
        self.events.as_ref().map_or(&[], |p| p.content.as_slice())
    }

    pub(crate) fn total_farmers(&self) -> u64 {
        self.farmers.as_ref().map_or(0, |p| p.total_elements)
    }

    pub(crate) fn total_pumps(&self) -> u64 {
        self.pumps.as_ref().map_or(0, |p| p.total_elements)
    }

    pub(crate) fn total_sensors(&self) -> u64 {
        self.sensors.as_ref().map_or(0, |p| p.total_elements)
    }
}

impl Resources {
    /// Load the four dashboard pages concurrently through the cache.
    pub async fn dashboard_data(&self) -> DashboardData {
        let (farmers, pumps, sensors, events) = tokio::join!(
            self.farmers(OVERVIEW_PAGE),
            self.pumps(OVERVIEW_PAGE),
            self.sensors(OVERVIEW_PAGE),
            self.events(OVERVIEW_EVENTS_PAGE),
        );
        let data = DashboardData {
            farmers: farmers.into_data(),
            pumps: pumps.into_data(),
            sensors: sensors.into_data(),
            events: events.into_data(),
        };
        debug!(
            "Dashboard data: {} farmers, {} pumps, {} sensors, {} events",
            data.farmers().len(),
            data.pumps().len(),
            data.sensors().len(),
            data.events().len()
        );
        data
    }

    pub async fn overview_stats(&self) -> OverviewStats {
        OverviewStats::compute(&self.dashboard_data().await)
    }

    pub async fn status_distribution(&self) -> StatusDistribution {
        StatusDistribution::compute(&self.dashboard_data().await)
    }

    pub async fn active_alerts(&self) -> Vec<Alert> {
        active_alerts(&self.dashboard_data().await, Utc::now())
    }
}
