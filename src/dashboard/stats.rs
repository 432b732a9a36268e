//! Overview counters and the status distribution chart.

use super::DashboardData;
use crate::models::{EquipmentEvent, EquipmentStatus, EventSeverity};
use crate::views::{DistributionRow, Kpi, Slice};
use serde::Serialize;

/// Counters behind the overview cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_farmers: u64,
    pub total_equipment: u64,
    pub total_pumps: u64,
    pub total_sensors: u64,
    pub active_equipment: u64,
    pub active_pumps: u64,
    pub active_sensors: u64,
    pub low_battery_sensors: u64,
    pub critical_sensors: u64,
    pub offline_sensors: u64,
    pub maintenance_pumps: u64,
    pub overdue_pumps: u64,
    pub critical_events: u64,
    pub warning_events: u64,
    pub unacknowledged_events: u64,
    pub recent_events: Vec<EquipmentEvent>,
}

/// How many events the overview lists.
pub const RECENT_EVENTS: usize = 10;

fn count<T>(items: &[T], pred: impl Fn(&T) -> bool) -> u64 {
    items.iter().filter(|item| pred(item)).count() as u64
}

impl OverviewStats {
    /// Totals come from `totalElements`; every other counter only sees the
    /// loaded page.
    pub fn compute(data: &DashboardData) -> Self {
        let pumps = data.pumps();
        let sensors = data.sensors();
        let events = data.events();

        let total_pumps = data.total_pumps();
        let total_sensors = data.total_sensors();
        let active_pumps = count(pumps, |p| p.status == EquipmentStatus::Active);
        let active_sensors = count(sensors, |s| s.active);

        Self {
            total_farmers: data.total_farmers(),
            total_equipment: total_pumps + total_sensors,
            total_pumps,
            total_sensors,
            active_equipment: active_pumps + active_sensors,
            active_pumps,
            active_sensors,
            low_battery_sensors: count(sensors, |s| s.battery_low || s.battery_critical),
            critical_sensors: count(sensors, |s| s.battery_critical),
            offline_sensors: count(sensors, |s| !s.online),
            maintenance_pumps: count(pumps, |p| p.status == EquipmentStatus::Maintenance),
            overdue_pumps: count(pumps, |p| p.maintenance_overdue),
            critical_events: count(events, |e| e.severity == EventSeverity::Critical),
            warning_events: count(events, |e| e.severity == EventSeverity::Warning),
            unacknowledged_events: count(events, |e| !e.acknowledged),
            recent_events: events.iter().take(RECENT_EVENTS).cloned().collect(),
        }
    }

    /// The four overview cards.
    pub fn kpis(&self) -> Vec<Kpi> {
        vec![
            Kpi::new("Total farmers", self.total_farmers),
            Kpi::new(
                "Active equipment",
                format!("{}/{}", self.active_equipment, self.total_equipment),
            )
            .with_description(format!(
                "{} pumps, {} sensors",
                self.active_pumps, self.active_sensors
            )),
            Kpi::new("Battery alerts", self.low_battery_sensors).with_description(format!(
                "{} critical, {} offline",
                self.critical_sensors, self.offline_sensors
            )),
            Kpi::new("Unacknowledged events", self.unacknowledged_events).with_description(
                format!(
                    "{} critical, {} warning",
                    self.critical_events, self.warning_events
                ),
            ),
        ]
    }
}

/// Data for the status bar chart and the equipment-type donut.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDistribution {
    pub status_data: Vec<DistributionRow>,
    pub equipment_type_data: Vec<Slice>,
}

impl StatusDistribution {
    pub fn compute(data: &DashboardData) -> Self {
        let pumps = data.pumps();
        let sensors = data.sensors();
        let pumps_with = |status: EquipmentStatus| count(pumps, |p| p.status == status);

        let status_data = vec![
            DistributionRow {
                name: "Active".to_string(),
                pumps: pumps_with(EquipmentStatus::Active),
                sensors: count(sensors, |s| s.active),
            },
            DistributionRow {
                name: "Inactive".to_string(),
                pumps: pumps_with(EquipmentStatus::Inactive),
                sensors: count(sensors, |s| !s.active),
            },
            // sensors have no maintenance state
            DistributionRow {
                name: "Maintenance".to_string(),
                pumps: pumps_with(EquipmentStatus::Maintenance),
                sensors: 0,
            },
        ];

        let equipment_type_data = vec![
            Slice {
                name: "Pumps".to_string(),
                value: data.total_pumps(),
            },
            Slice {
                name: "Sensors".to_string(),
                value: data.total_sensors(),
            },
        ];

        Self {
            status_data,
            equipment_type_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConnectedPump, ConnectedSensor, Page};

    fn pump(id: &str, status: EquipmentStatus, overdue: bool) -> ConnectedPump {
        ConnectedPump {
            id: id.into(),
            status,
            maintenance_overdue: overdue,
            ..Default::default()
        }
    }

    fn sensor(id: &str, active: bool, online: bool, low: bool, critical: bool) -> ConnectedSensor {
        ConnectedSensor {
            id: id.into(),
            active,
            online,
            battery_low: low,
            battery_critical: critical,
            ..Default::default()
        }
    }

    fn sample() -> DashboardData {
        let pumps = vec![
            pump("p1", EquipmentStatus::Active, false),
            pump("p2", EquipmentStatus::Maintenance, true),
            pump("p3", EquipmentStatus::Inactive, false),
        ];
        let sensors = vec![
            sensor("s1", true, true, false, false),
            sensor("s2", true, false, true, false),
            sensor("s3", false, true, false, true),
        ];
        let events = (0..15)
            .map(|i| EquipmentEvent {
                id: format!("e{i}"),
                severity: if i % 5 == 0 {
                    EventSeverity::Critical
                } else {
                    EventSeverity::Warning
                },
                acknowledged: i >= 4,
                ..Default::default()
            })
            .collect();
        DashboardData {
            farmers: Some(Page::new(Vec::new(), 0, 1000, 42)),
            // totalElements is larger than what was loaded
            pumps: Some(Page::new(pumps, 0, 1000, 5)),
            sensors: Some(Page::new(sensors, 0, 1000, 3)),
            events: Some(Page::new(events, 0, 100, 15)),
        }
    }

    #[test]
    fn test_overview_counts() {
        let stats = OverviewStats::compute(&sample());
        assert_eq!(stats.total_farmers, 42);
        assert_eq!(stats.total_pumps, 5);
        assert_eq!(stats.total_equipment, 8);
        assert_eq!(stats.active_pumps, 1);
        assert_eq!(stats.active_sensors, 2);
        assert_eq!(stats.active_equipment, 3);
        assert_eq!(stats.low_battery_sensors, 2);
        assert_eq!(stats.critical_sensors, 1);
        assert_eq!(stats.offline_sensors, 1);
        assert_eq!(stats.maintenance_pumps, 1);
        assert_eq!(stats.overdue_pumps, 1);
        assert_eq!(stats.critical_events, 3);
        assert_eq!(stats.warning_events, 12);
        assert_eq!(stats.unacknowledged_events, 4);
        assert_eq!(stats.recent_events.len(), RECENT_EVENTS);
        assert_eq!(stats.recent_events[0].id, "e0");
    }

    #[test]
    fn test_missing_data_counts_as_zero() {
        let stats = OverviewStats::compute(&DashboardData::default());
        assert_eq!(stats, OverviewStats::default());
        assert_eq!(stats.kpis().len(), 4);
    }

    #[test]
    fn test_distribution_rows() {
        let dist = StatusDistribution::compute(&sample());
        let rows: Vec<(&str, u64, u64)> = dist
            .status_data
            .iter()
            .map(|r| (r.name.as_str(), r.pumps, r.sensors))
            .collect();
        assert_eq!(
            rows,
            vec![("Active", 1, 2), ("Inactive", 1, 1), ("Maintenance", 1, 0)]
        );
        assert_eq!(dist.equipment_type_data[0].value, 5);
        assert_eq!(dist.equipment_type_data[1].value, 3);

        let json = serde_json::to_value(&dist).unwrap();
        assert!(json.get("statusData").is_some());
        assert!(json.get("equipmentTypeData").is_some());
    }
}
