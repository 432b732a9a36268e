//! The active-alerts panel.
//!
//! Alerts are derived from the loaded sensors, pumps and events; the backend
//! has no alert resource of its own.

use super::DashboardData;
use crate::models::EventSeverity;
use crate::views::format::parse_timestamp;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// How many unacknowledged critical events become alerts.
pub const MAX_EVENT_ALERTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    High,
    Medium,
    Low,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Battery,
    Offline,
    Maintenance,
    Critical,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Battery => "battery",
            Self::Offline => "offline",
            Self::Maintenance => "maintenance",
            Self::Critical => "critical",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub equipment_id: String,
    pub equipment_type: String,
    pub message: String,
    pub severity: AlertSeverity,
    pub timestamp: String,
}

/// Build the alert list as of `now`.
///
/// Battery alerts are critical (high) or else low (medium); offline sensors
/// are high; overdue pumps are medium; the first few unacknowledged critical
/// events are high. High sorts before medium, newest first within a severity.
/// Timestamps that do not parse sort after the rest of their severity.
pub fn active_alerts(data: &DashboardData, now: DateTime<Utc>) -> Vec<Alert> {
    let now = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut alerts = Vec::new();

    for sensor in data.sensors() {
        let (id, message, severity) = if sensor.battery_critical {
            (
                format!("battery-critical-{}", sensor.id),
                format!("Critical battery level ({}%)", sensor.battery),
                AlertSeverity::High,
            )
        } else if sensor.battery_low {
            (
                format!("battery-low-{}", sensor.id),
                format!("Low battery level ({}%)", sensor.battery),
                AlertSeverity::Medium,
            )
        } else {
            continue;
        };
        alerts.push(Alert {
            id,
            kind: AlertKind::Battery,
            equipment_id: sensor.id.clone(),
            equipment_type: "Sensor".to_string(),
            message,
            severity,
            timestamp: now.clone(),
        });
    }

    alerts.extend(data.sensors().iter().filter(|s| !s.online).map(|sensor| Alert {
        id: format!("offline-{}", sensor.id),
        kind: AlertKind::Offline,
        equipment_id: sensor.id.clone(),
        equipment_type: "Sensor".to_string(),
        message: "Sensor is offline".to_string(),
        severity: AlertSeverity::High,
        timestamp: sensor.last_communication.clone(),
    }));

    alerts.extend(
        data.pumps()
            .iter()
            .filter(|p| p.maintenance_overdue)
            .map(|pump| Alert {
                id: format!("maintenance-{}", pump.id),
                kind: AlertKind::Maintenance,
                equipment_id: pump.id.clone(),
                equipment_type: "Pump".to_string(),
                message: "Maintenance overdue".to_string(),
                severity: AlertSeverity::Medium,
                timestamp: pump
                    .next_maintenance_date
                    .clone()
                    .unwrap_or_else(|| now.clone()),
            }),
    );

    alerts.extend(
        data.events()
            .iter()
            .filter(|e| e.severity == EventSeverity::Critical && !e.acknowledged)
            .take(MAX_EVENT_ALERTS)
            .map(|event| Alert {
                id: format!("event-{}", event.id),
                kind: AlertKind::Critical,
                equipment_id: event.equipment_id.clone(),
                equipment_type: if event.equipment_type.is_empty() {
                    "Equipment".to_string()
                } else {
                    event.equipment_type.clone()
                },
                message: event.message.clone(),
                severity: AlertSeverity::High,
                timestamp: event.timestamp.clone(),
            }),
    );

    alerts.sort_by(compare);
    alerts
}

fn compare(a: &Alert, b: &Alert) -> Ordering {
    a.severity.cmp(&b.severity).then_with(|| {
        match (parse_timestamp(&a.timestamp), parse_timestamp(&b.timestamp)) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConnectedPump, ConnectedSensor, EquipmentEvent, Page};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn data() -> DashboardData {
        let sensors = vec![
            ConnectedSensor {
                id: "s1".into(),
                battery: 8,
                battery_critical: true,
                battery_low: true,
                online: true,
                ..Default::default()
            },
            ConnectedSensor {
                id: "s2".into(),
                battery: 35,
                battery_low: true,
                online: false,
                last_communication: "2024-05-30T08:00:00Z".into(),
                ..Default::default()
            },
            ConnectedSensor {
                id: "s3".into(),
                battery: 90,
                online: true,
                ..Default::default()
            },
        ];
        let pumps = vec![ConnectedPump {
            id: "p1".into(),
            maintenance_overdue: true,
            next_maintenance_date: Some("2024-05-20".into()),
            ..Default::default()
        }];
        let events = (0..7)
            .map(|i| EquipmentEvent {
                id: format!("e{i}"),
                equipment_id: "p1".into(),
                severity: EventSeverity::Critical,
                message: format!("Pump failure {i}"),
                timestamp: format!("2024-05-2{i}T10:00:00Z"),
                ..Default::default()
            })
            .collect();
        DashboardData {
            sensors: Some(Page::new(sensors, 0, 1000, 3)),
            pumps: Some(Page::new(pumps, 0, 1000, 1)),
            events: Some(Page::new(events, 0, 100, 7)),
            ..Default::default()
        }
    }

    #[test]
    fn test_alert_sources() {
        let alerts = active_alerts(&data(), now());
        let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();

        assert!(ids.contains(&"battery-critical-s1"));
        assert!(!ids.contains(&"battery-low-s1"));
        assert!(ids.contains(&"battery-low-s2"));
        assert!(ids.contains(&"offline-s2"));
        assert!(ids.contains(&"maintenance-p1"));
        // only the first five critical events
        assert_eq!(alerts.iter().filter(|a| a.kind == AlertKind::Critical).count(), 5);
        assert!(!ids.contains(&"event-e5"));

        let critical = alerts.iter().find(|a| a.id == "battery-critical-s1").unwrap();
        assert_eq!(critical.message, "Critical battery level (8%)");
        assert_eq!(critical.timestamp, "2024-06-01T12:00:00.000Z");
        let event = alerts.iter().find(|a| a.id == "event-e0").unwrap();
        assert_eq!(event.equipment_type, "Equipment");
    }

    #[test]
    fn test_alerts_sorted_by_severity_then_newest() {
        let alerts = active_alerts(&data(), now());
        let first_medium = alerts
            .iter()
            .position(|a| a.severity == AlertSeverity::Medium)
            .unwrap();
        assert!(alerts[..first_medium]
            .iter()
            .all(|a| a.severity == AlertSeverity::High));
        assert!(alerts[first_medium..]
            .iter()
            .all(|a| a.severity == AlertSeverity::Medium));

        // battery alert is stamped "now", the newest high alert
        assert_eq!(alerts[0].id, "battery-critical-s1");
        assert_eq!(alerts[1].id, "offline-s2");
        assert_eq!(alerts[2].id, "event-e4");
        assert_eq!(alerts.last().unwrap().id, "maintenance-p1");
    }

    #[test]
    fn test_alert_json_shape() {
        let alerts = active_alerts(&data(), now());
        let json = serde_json::to_value(&alerts[0]).unwrap();
        assert_eq!(json["type"], "battery");
        assert_eq!(json["severity"], "high");
        assert_eq!(json["equipmentId"], "s1");
    }
}
