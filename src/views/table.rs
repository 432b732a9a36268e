//! Paginated text tables.

use super::badges::{active_badge, battery_indicator, severity_badge, status_badge};
use super::format::{format_date, format_date_time, initials};
use crate::models::{ConnectedPump, ConnectedSensor, EquipmentEvent, Farm, Farmer, Page};
use crate::query::QueryState;

/// A table column: header plus cell renderer.
pub struct Column<T> {
    pub header: &'static str,
    pub cell: fn(&T) -> String,
}

impl<T> Column<T> {
    pub const fn new(header: &'static str, cell: fn(&T) -> String) -> Self {
        Self { header, cell }
    }
}

/// "Showing page 2 of 5 (47 total farmers)" plus navigation availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIndicator {
    pub text: String,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageIndicator {
    pub fn new<T>(page: &Page<T>, noun: &str) -> Self {
        Self {
            text: format!(
                "Showing page {} of {} ({} total {})",
                page.display_number(),
                page.total_pages,
                page.total_elements,
                noun
            ),
            has_previous: page.has_previous(),
            has_next: page.has_next(),
        }
    }

    /// Indicator line with the available navigation hints.
    pub fn render(&self) -> String {
        let mut line = String::new();
        if self.has_previous {
            line.push_str("« Previous  ");
        }
        line.push_str(&self.text);
        if self.has_next {
            line.push_str("  Next »");
        }
        line
    }
}

/// A list view over pages of `T`, named by `noun` ("farmers", "events").
pub struct TableView<T> {
    noun: &'static str,
    columns: Vec<Column<T>>,
}

impl<T> TableView<T> {
    pub fn new(noun: &'static str, columns: Vec<Column<T>>) -> Self {
        Self { noun, columns }
    }

    pub fn noun(&self) -> &str {
        self.noun
    }

    /// Render a query state: loading, error, or the page itself.
    pub fn render_state(&self, state: &QueryState<Page<T>>) -> String {
        match state {
            QueryState::Disabled => String::new(),
            QueryState::Loading => "Loading...".to_string(),
            QueryState::Error(_) => format!("Failed to load {}", self.noun),
            QueryState::Success(page) => self.render_page(page),
        }
    }

    /// Exactly the page's items, then the page indicator.
    pub fn render_page(&self, page: &Page<T>) -> String {
        if page.is_empty() {
            return format!("No {} found", self.noun);
        }
        let mut out = self.render_rows(&page.content);
        out.push('\n');
        out.push_str(&PageIndicator::new(page, self.noun).render());
        out
    }

    /// Header, separator and one line per item.
    pub fn render_rows(&self, items: &[T]) -> String {
        let cells: Vec<Vec<String>> = items
            .iter()
            .map(|item| self.columns.iter().map(|c| (c.cell)(item)).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(column.header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(items.len() + 2);
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();
        lines.push(join_padded(&headers, &widths));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        for row in &cells {
            lines.push(join_padded(row, &widths));
        }
        lines.join("\n")
    }
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub fn farmers_table() -> TableView<Farmer> {
    TableView::new(
        "farmers",
        vec![
            Column::new("", |f: &Farmer| initials(&f.first_name, &f.last_name)),
            Column::new("Farmer", |f: &Farmer| f.full_name()),
            Column::new("ID", |f: &Farmer| f.id.clone()),
            Column::new("Email", |f: &Farmer| f.email.clone()),
            Column::new("Phone", |f: &Farmer| f.phone_number.clone()),
            Column::new("Registration Date", |f: &Farmer| format_date(&f.registration_date)),
            Column::new("Status", |f: &Farmer| active_badge(f.active).to_string()),
        ],
    )
}

pub fn farms_table() -> TableView<Farm> {
    TableView::new(
        "farms",
        vec![
            Column::new("Name", |f: &Farm| f.name.clone()),
            Column::new("ID", |f: &Farm| f.id.clone()),
            Column::new("Location", |f: &Farm| f.location.clone()),
            Column::new("Size (ha)", |f: &Farm| format!("{:.1}", f.size)),
            Column::new("Created", |f: &Farm| format_date(&f.created_at)),
        ],
    )
}

pub fn pumps_table() -> TableView<ConnectedPump> {
    TableView::new(
        "pumps",
        vec![
            Column::new("Model", |p: &ConnectedPump| p.model.clone()),
            Column::new("ID", |p: &ConnectedPump| p.id.clone()),
            Column::new("Status", |p: &ConnectedPump| status_badge(p.status).to_string()),
            Column::new("Max Flow", |p: &ConnectedPump| {
                if p.formatted_max_flow.is_empty() {
                    format!("{} L/h", p.max_flow)
                } else {
                    p.formatted_max_flow.clone()
                }
            }),
            Column::new("Location", |p: &ConnectedPump| p.location.clone()),
            Column::new("Next Maintenance", |p: &ConnectedPump| {
                let next = p
                    .next_maintenance_date
                    .as_deref()
                    .map(format_date)
                    .unwrap_or_else(|| "-".to_string());
                if p.maintenance_overdue {
                    format!("{} (overdue)", next)
                } else {
                    next
                }
            }),
        ],
    )
}

pub fn sensors_table() -> TableView<ConnectedSensor> {
    TableView::new(
        "sensors",
        vec![
            Column::new("Model", |s: &ConnectedSensor| s.model.clone()),
            Column::new("ID", |s: &ConnectedSensor| s.id.clone()),
            Column::new("Type", |s: &ConnectedSensor| s.sensor_type.to_string()),
            Column::new("Battery", |s: &ConnectedSensor| {
                let status = Some(s.battery_status.as_str()).filter(|v| !v.is_empty());
                battery_indicator(s.battery, status)
            }),
            Column::new("Online", |s: &ConnectedSensor| if s.online { "yes" } else { "no" }.to_string()),
            Column::new("Location", |s: &ConnectedSensor| s.location.clone()),
        ],
    )
}

pub fn events_table() -> TableView<EquipmentEvent> {
    TableView::new(
        "events",
        vec![
            Column::new("Severity", |e: &EquipmentEvent| severity_badge(e.severity).to_string()),
            Column::new("Type", |e: &EquipmentEvent| e.event_type.to_string()),
            Column::new("Message", |e: &EquipmentEvent| e.message.clone()),
            Column::new("Equipment", |e: &EquipmentEvent| e.equipment_id.clone()),
            Column::new("Time", |e: &EquipmentEvent| format_date_time(&e.timestamp)),
            Column::new("Ack", |e: &EquipmentEvent| {
                match (e.acknowledged, e.acknowledged_by.as_deref()) {
                    (true, Some(by)) => format!("by {}", by),
                    (true, None) => "yes".to_string(),
                    (false, _) => "no".to_string(),
                }
            }),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farmer(n: usize) -> Farmer {
        Farmer {
            id: format!("f-{n}"),
            first_name: format!("Farmer{n}"),
            last_name: "Otieno".into(),
            email: format!("farmer{n}@example.com"),
            active: n % 2 == 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_page_renders_its_items_and_indicator() {
        let page = Page::new((0..10).map(farmer).collect(), 1, 10, 47);
        let rendered = farmers_table().render_page(&page);
        let lines: Vec<&str> = rendered.lines().collect();

        // header + separator + 10 rows + indicator
        assert_eq!(lines.len(), 13);
        assert_eq!(
            lines[12],
            "« Previous  Showing page 2 of 5 (47 total farmers)  Next »"
        );
        assert!(lines[2].contains("farmer0@example.com"));
        assert!(lines[11].contains("farmer9@example.com"));
    }

    #[test]
    fn test_navigation_flags_at_the_edges() {
        let first: Page<Farmer> = Page::new(vec![farmer(1)], 0, 10, 1);
        let indicator = PageIndicator::new(&first, "farmers");
        assert!(!indicator.has_previous);
        assert!(!indicator.has_next);
        assert_eq!(indicator.render(), "Showing page 1 of 1 (1 total farmers)");

        let last: Page<Farmer> = Page::new(vec![farmer(1)], 4, 10, 41);
        let indicator = PageIndicator::new(&last, "farmers");
        assert!(indicator.has_previous);
        assert!(!indicator.has_next);
    }

    #[test]
    fn test_last_representable_page_number_renders() {
        let page: Page<Farmer> = serde_json::from_str(
            r#"{"content":[{"id":"a"}],"totalElements":1,"totalPages":1,"number":4294967295,"size":10}"#,
        )
        .unwrap();
        let rendered = farmers_table().render_page(&page);
        assert!(rendered.ends_with("« Previous  Showing page 4294967296 of 1 (1 total farmers)"));
        assert!(!page.has_next());
    }

    #[test]
    fn test_states() {
        let table = events_table();
        assert_eq!(table.render_state(&QueryState::Loading), "Loading...");
        assert_eq!(
            table.render_state(&QueryState::Error("boom".into())),
            "Failed to load events"
        );
        assert_eq!(
            table.render_state(&QueryState::Success(Page::default())),
            "No events found"
        );
    }
}
