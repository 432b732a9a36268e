//! Pumps, sensors and their maintenance records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of a pump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

impl EquipmentStatus {
    pub const ALL: [EquipmentStatus; 3] = [Self::Active, Self::Inactive, Self::Maintenance];

    /// Wire name, e.g. `"MAINTENANCE"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Maintenance => "MAINTENANCE",
        }
    }

    /// Human label, e.g. `"Maintenance"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Maintenance => "Maintenance",
        }
    }

    /// Parse the wire name, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a sensor measures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorType {
    #[default]
    Temperature,
    Humidity,
    SoilMoisture,
}

impl SensorType {
    pub const ALL: [SensorType; 3] = [Self::Temperature, Self::Humidity, Self::SoilMoisture];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "TEMPERATURE",
            Self::Humidity => "HUMIDITY",
            Self::SoilMoisture => "SOIL_MOISTURE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An irrigation pump connected to the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectedPump {
    pub id: String,
    pub farm_id: String,
    pub model: String,
    pub status: EquipmentStatus,
    /// Maximum flow in litres per hour
    pub max_flow: f64,
    /// Server-formatted flow, e.g. "1,200 L/h"
    pub formatted_max_flow: String,
    pub location: String,
    pub installation_date: String,
    pub last_maintenance_date: Option<String>,
    pub next_maintenance_date: Option<String>,
    pub maintenance_notes: Option<String>,
    pub operational: bool,
    pub maintenance_overdue: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A field sensor connected to the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectedSensor {
    pub id: String,
    pub farm_id: String,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub model: String,
    /// Battery level in percent (0-100)
    pub battery: u8,
    /// Server classification: GOOD, LOW or CRITICAL
    pub battery_status: String,
    pub last_communication: String,
    pub location: String,
    pub installation_date: String,
    pub active: bool,
    pub alert_threshold: Option<u8>,
    pub battery_low: bool,
    pub battery_critical: bool,
    pub online: bool,
    /// Measurement unit, e.g. "°C"
    pub unit: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePumpRequest {
    pub farm_id: String,
    pub model: String,
    pub status: EquipmentStatus,
    pub max_flow: f64,
    pub location: String,
    pub installation_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePumpRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EquipmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_flow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_maintenance_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_maintenance_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSensorRequest {
    pub farm_id: String,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub model: String,
    pub battery: u8,
    pub location: String,
    pub installation_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_threshold: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSensorRequest {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<SensorType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_threshold: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_communication: Option<String>,
}

/// Body of `POST /api/pumps/{id}/maintenance`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    pub scheduled_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Equipment counts for one farm, with the equipment itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FarmEquipmentReport {
    pub farm_id: String,
    pub active_pumps: u64,
    pub inactive_pumps: u64,
    pub maintenance_pumps: u64,
    pub total_pumps: u64,
    pub active_sensors: u64,
    pub inactive_sensors: u64,
    pub total_sensors: u64,
    pub pumps: Vec<ConnectedPump>,
    pub sensors: Vec<ConnectedSensor>,
}

/// Fleet-wide equipment totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentStatistics {
    pub total_pumps: u64,
    pub active_pumps: u64,
    pub inactive_pumps: u64,
    pub maintenance_pumps: u64,
    pub total_sensors: u64,
    pub active_sensors: u64,
    pub inactive_sensors: u64,
    pub low_battery_sensors: u64,
    pub critical_battery_sensors: u64,
    pub total_equipment: u64,
    pub active_equipment: u64,
}

/// Lifecycle of a maintenance task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceStatus {
    #[default]
    Scheduled,
    Overdue,
    Completed,
}

/// One entry of the maintenance schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaintenanceSchedule {
    pub equipment_id: String,
    /// PUMP or SENSOR
    pub equipment_type: String,
    pub equipment_name: String,
    pub farm_id: String,
    pub scheduled_date: String,
    pub last_maintenance_date: Option<String>,
    pub status: MaintenanceStatus,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_type_field_is_renamed() {
        let json = r#"{"id":"s1","type":"SOIL_MOISTURE","battery":42,"batteryLow":true}"#;
        let sensor: ConnectedSensor = serde_json::from_str(json).unwrap();
        assert_eq!(sensor.sensor_type, SensorType::SoilMoisture);
        assert_eq!(sensor.battery, 42);
        assert!(sensor.battery_low);
        assert!(!sensor.online);
    }

    #[test]
    fn test_update_request_skips_unset_fields() {
        let update = UpdatePumpRequest {
            status: Some(EquipmentStatus::Maintenance),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"status": "MAINTENANCE"}));
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(
            EquipmentStatus::parse("maintenance"),
            Some(EquipmentStatus::Maintenance)
        );
        assert_eq!(SensorType::parse("soil_moisture"), Some(SensorType::SoilMoisture));
        assert_eq!(EquipmentStatus::parse("broken"), None);
    }
}
