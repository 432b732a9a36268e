//! Equipment events emitted by the supervision service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of equipment event.
///
/// Unknown kinds are kept verbatim in [`EventType::Other`] so newer backends
/// do not break decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    EquipmentCreated,
    StatusChanged,
    MaintenanceScheduled,
    MaintenanceCompleted,
    BatteryLow,
    SensorOffline,
    EquipmentFailure,
    SystemAlert,
    Other(String),
}

impl EventType {
    pub const KNOWN: [EventType; 8] = [
        Self::EquipmentCreated,
        Self::StatusChanged,
        Self::MaintenanceScheduled,
        Self::MaintenanceCompleted,
        Self::BatteryLow,
        Self::SensorOffline,
        Self::EquipmentFailure,
        Self::SystemAlert,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::EquipmentCreated => "EQUIPMENT_CREATED",
            Self::StatusChanged => "STATUS_CHANGED",
            Self::MaintenanceScheduled => "MAINTENANCE_SCHEDULED",
            Self::MaintenanceCompleted => "MAINTENANCE_COMPLETED",
            Self::BatteryLow => "BATTERY_LOW",
            Self::SensorOffline => "SENSOR_OFFLINE",
            Self::EquipmentFailure => "EQUIPMENT_FAILURE",
            Self::SystemAlert => "SYSTEM_ALERT",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for EventType {
    fn default() -> Self {
        Self::SystemAlert
    }
}

impl From<String> for EventType {
    fn from(raw: String) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .unwrap_or(Self::Other(raw))
    }
}

impl From<EventType> for String {
    fn from(kind: EventType) -> Self {
        match kind {
            EventType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How urgent an event is.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventSeverity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl EventSeverity {
    pub const ALL: [EventSeverity; 3] = [Self::Info, Self::Warning, Self::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for EventSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification about an equipment state change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentEvent {
    pub id: String,
    pub event_type: EventType,
    pub equipment_id: String,
    /// PUMP or SENSOR
    pub equipment_type: String,
    pub farm_id: String,
    pub timestamp: String,
    pub payload: serde_json::Map<String, serde_json::Value>,
    pub message: String,
    pub severity: EventSeverity,
    pub acknowledged: bool,
    pub acknowledged_at: Option<String>,
    pub acknowledged_by: Option<String>,
    pub received_at: String,
    pub processed: bool,
    pub processing_notes: Option<String>,
}

/// Criteria for `POST /api/events/filter`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<EventSeverity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged: Option<bool>,
}

impl EventFilterRequest {
    /// True when no criterion is set; such a filter is never sent.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Body of `POST /api/events/{id}/acknowledge`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgeEventRequest {
    pub acknowledged_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Supervision dashboard aggregates computed by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStatistics {
    pub total_events: u64,
    pub unacknowledged_events: u64,
    pub critical_events: u64,
    pub warning_events: u64,
    pub info_events: u64,
    pub event_counts_by_type: BTreeMap<String, u64>,
    pub event_counts_by_severity: BTreeMap<String, u64>,
    pub recent_critical_events: Vec<EquipmentEvent>,
    pub recent_events: Vec<EquipmentEvent>,
    /// Keyed by ISO date
    pub daily_event_counts: BTreeMap<String, u64>,
    pub events_last24_hours: u64,
    pub events_last7_days: u64,
    pub events_last30_days: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_event_type_is_preserved() {
        let event: EquipmentEvent =
            serde_json::from_str(r#"{"id":"e1","eventType":"FIRMWARE_UPDATED"}"#).unwrap();
        assert_eq!(event.event_type, EventType::Other("FIRMWARE_UPDATED".into()));
        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["eventType"], "FIRMWARE_UPDATED");
    }

    #[test]
    fn test_known_event_type_decodes() {
        let event: EquipmentEvent = serde_json::from_str(
            r#"{"id":"e2","eventType":"BATTERY_LOW","severity":"WARNING"}"#,
        )
        .unwrap();
        assert_eq!(event.event_type, EventType::BatteryLow);
        assert_eq!(event.severity, EventSeverity::Warning);
    }

    #[test]
    fn test_empty_filter() {
        assert!(EventFilterRequest::default().is_empty());
        let filter = EventFilterRequest {
            severity: Some(EventSeverity::Critical),
            ..Default::default()
        };
        assert!(!filter.is_empty());
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            serde_json::json!({"severity": "CRITICAL"})
        );
    }

    #[test]
    fn test_dashboard_statistics_field_names() {
        let stats: DashboardStatistics = serde_json::from_str(
            r#"{"eventsLast24Hours":3,"eventsLast7Days":9,"dailyEventCounts":{"2024-05-01":2}}"#,
        )
        .unwrap();
        assert_eq!(stats.events_last24_hours, 3);
        assert_eq!(stats.events_last7_days, 9);
        assert_eq!(stats.daily_event_counts.get("2024-05-01"), Some(&2));
    }
}
