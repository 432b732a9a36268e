//! CSV export of dashboard data.
//!
//! Files are named `<name>_<YYYY-MM-DD>.csv` and written into the export
//! directory. Exporting nothing is an error and writes no file.

use crate::dashboard::{Alert, OverviewStats};
use crate::error::{DashboardError, Result};
use crate::models::EquipmentEvent;
use crate::views::format::format_date_time;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const SUMMARY_EXPORT: &str = "dashboard_summary";
pub const EVENTS_EXPORT: &str = "events_report";
pub const ALERTS_EXPORT: &str = "alerts_report";

const EVENT_HEADERS: [&str; 8] = [
    "id",
    "message",
    "equipmentId",
    "equipmentType",
    "severity",
    "type",
    "timestamp",
    "acknowledged",
];

const ALERT_HEADERS: [&str; 7] = [
    "id",
    "type",
    "equipmentId",
    "equipmentType",
    "message",
    "severity",
    "timestamp",
];

/// One CSV cell. Strings holding a comma or a quote are quoted, with inner
/// quotes doubled; `null` is empty.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) if s.contains(',') || s.contains('"') => {
            format!("\"{}\"", s.replace('"', "\"\""))
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a header row plus one line per row.
pub fn to_csv(headers: &[&str], rows: &[Vec<Value>]) -> Result<String> {
    if rows.is_empty() {
        error!("No data to export");
        return Err(DashboardError::export_error("No data to export"));
    }
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));
    for row in rows {
        lines.push(row.iter().map(cell).collect::<Vec<_>>().join(","));
    }
    Ok(lines.join("\n"))
}

/// `<name>_<YYYY-MM-DD>.csv`
pub fn export_filename(name: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", name, date.format("%Y-%m-%d"))
}

pub fn summary_rows(stats: &OverviewStats) -> Vec<Vec<Value>> {
    [
        ("Total Farmers", stats.total_farmers),
        ("Total Equipment", stats.total_equipment),
        ("Total Pumps", stats.total_pumps),
        ("Total Sensors", stats.total_sensors),
        ("Active Equipment", stats.active_equipment),
        ("Low Battery Sensors", stats.low_battery_sensors),
        ("Critical Sensors", stats.critical_sensors),
        ("Offline Sensors", stats.offline_sensors),
        ("Equipment in Maintenance", stats.maintenance_pumps),
        ("Overdue Maintenance", stats.overdue_pumps),
        ("Critical Events", stats.critical_events),
        ("Warning Events", stats.warning_events),
        ("Unacknowledged Events", stats.unacknowledged_events),
    ]
    .into_iter()
    .map(|(metric, value)| vec![json!(metric), json!(value)])
    .collect()
}

pub fn event_rows(events: &[EquipmentEvent]) -> Vec<Vec<Value>> {
    events
        .iter()
        .map(|event| {
            let equipment_type = if event.equipment_type.is_empty() {
                "N/A"
            } else {
                event.equipment_type.as_str()
            };
            vec![
                json!(event.id),
                json!(event.message),
                json!(event.equipment_id),
                json!(equipment_type),
                json!(event.severity.as_str()),
                json!(event.event_type.as_str()),
                json!(format_date_time(&event.timestamp)),
                json!(if event.acknowledged { "Yes" } else { "No" }),
            ]
        })
        .collect()
}

pub fn alert_rows(alerts: &[Alert]) -> Vec<Vec<Value>> {
    alerts
        .iter()
        .map(|alert| {
            vec![
                json!(alert.id),
                json!(alert.kind.to_string()),
                json!(alert.equipment_id),
                json!(alert.equipment_type),
                json!(alert.message),
                json!(alert.severity.to_string()),
                json!(format_date_time(&alert.timestamp)),
            ]
        })
        .collect()
}

/// Writes CSV exports into a directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
    date: Option<NaiveDate>,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            date: None,
        }
    }

    /// Stamp files with `date` instead of today's UTC date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn export_dashboard_summary(&self, stats: &OverviewStats) -> Result<PathBuf> {
        self.write(SUMMARY_EXPORT, &["metric", "value"], &summary_rows(stats))
            .await
    }

    pub async fn export_events(&self, events: &[EquipmentEvent]) -> Result<PathBuf> {
        self.write(EVENTS_EXPORT, &EVENT_HEADERS, &event_rows(events))
            .await
    }

    pub async fn export_alerts(&self, alerts: &[Alert]) -> Result<PathBuf> {
        self.write(ALERTS_EXPORT, &ALERT_HEADERS, &alert_rows(alerts))
            .await
    }

    async fn write(&self, name: &str, headers: &[&str], rows: &[Vec<Value>]) -> Result<PathBuf> {
        let content = to_csv(headers, rows)?;
        let date = self.date.unwrap_or_else(|| Utc::now().date_naive());
        let path = self.dir.join(export_filename(name, date));

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, content).await?;
        info!("Exported {} rows to {}", rows.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventSeverity;

    #[test]
    fn test_cells_are_quoted_when_needed() {
        assert_eq!(cell(&json!("plain")), "plain");
        assert_eq!(cell(&json!("a, b")), "\"a, b\"");
        assert_eq!(cell(&json!("say \"hi\"")), "\"say \"\"hi\"\"\"");
        assert_eq!(cell(&json!(42)), "42");
        assert_eq!(cell(&Value::Null), "");
    }

    #[test]
    fn test_empty_export_is_rejected() {
        let err = to_csv(&["id"], &[]).unwrap_err();
        assert!(matches!(err, DashboardError::Export(_)));
    }

    #[test]
    fn test_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_filename("events_report", date), "events_report_2024-03-09.csv");
    }

    #[tokio::test]
    async fn test_summary_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path()).with_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        let stats = OverviewStats {
            total_farmers: 7,
            ..Default::default()
        };

        let path = exporter.export_dashboard_summary(&stats).await.unwrap();
        assert!(path.ends_with("dashboard_summary_2024-01-15.csv"));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 14);
        assert_eq!(lines[0], "metric,value");
        assert_eq!(lines[1], "Total Farmers,7");
    }

    #[tokio::test]
    async fn test_event_export_and_empty_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path().join("out"));

        assert!(exporter.export_events(&[]).await.is_err());
        assert!(!dir.path().join("out").exists());

        let event = EquipmentEvent {
            id: "e1".into(),
            message: "Pump stopped, pressure lost".into(),
            severity: EventSeverity::Critical,
            ..Default::default()
        };
        let path = exporter.export_events(&[event]).await.unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "e1,\"Pump stopped, pressure lost\",,N/A,CRITICAL,SYSTEM_ALERT,,No"
        );
    }
}
