//! Chart series as plain data, plus text renderings.

use serde::Serialize;
use std::collections::BTreeMap;

/// One group of the status distribution bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionRow {
    pub name: String,
    pub pumps: u64,
    pub sensors: u64,
}

/// One slice of a donut chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub name: String,
    pub value: u64,
}

/// A KPI card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kpi {
    pub title: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Kpi {
    pub fn new(title: impl Into<String>, value: impl ToString) -> Self {
        Self {
            title: title.into(),
            value: value.to_string(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One point of the daily event area series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub name: String,
    pub value: u64,
}

/// Daily counts keyed by ISO date, in date order.
pub fn daily_series(counts: &BTreeMap<String, u64>) -> Vec<SeriesPoint> {
    counts
        .iter()
        .map(|(date, count)| SeriesPoint {
            name: date.clone(),
            value: *count,
        })
        .collect()
}

const BAR_WIDTH: usize = 30;

fn bar(value: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let len = ((value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.max(usize::from(value > 0)))
}

pub fn render_distribution(rows: &[DistributionRow]) -> String {
    let max = rows
        .iter()
        .flat_map(|r| [r.pumps, r.sensors])
        .max()
        .unwrap_or(0);
    let label_width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    rows.iter()
        .map(|row| {
            format!(
                "{:<label_width$}  pumps   {} {}\n{:<label_width$}  sensors {} {}",
                row.name,
                bar(row.pumps, max),
                row.pumps,
                "",
                bar(row.sensors, max),
                row.sensors,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_slices(slices: &[Slice]) -> String {
    let total: u64 = slices.iter().map(|s| s.value).sum();
    slices
        .iter()
        .map(|slice| {
            let share = if total == 0 {
                0.0
            } else {
                slice.value as f64 * 100.0 / total as f64
            };
            format!("{}: {} ({:.0}%)", slice.name, slice.value, share)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_kpis(kpis: &[Kpi]) -> String {
    let width = kpis.iter().map(|k| k.title.len()).max().unwrap_or(0);
    kpis.iter()
        .map(|kpi| match &kpi.description {
            Some(description) => format!("{:<width$}  {}  ({})", kpi.title, kpi.value, description),
            None => format!("{:<width$}  {}", kpi.title, kpi.value),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_series(points: &[SeriesPoint]) -> String {
    let max = points.iter().map(|p| p.value).max().unwrap_or(0);
    points
        .iter()
        .map(|p| format!("{}  {} {}", p.name, bar(p.value, max), p.value))
        .collect::<Vec<_>>()
        .join("\n")
}
