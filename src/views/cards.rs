//! Detail cards.

use super::badges::{active_badge, battery_indicator, status_badge};
use super::format::{format_date, initials};
use crate::models::{ConnectedPump, ConnectedSensor, Farmer};

/// Farmer card: initials, full name, id, status, contact lines.
pub fn farmer_card(farmer: &Farmer) -> String {
    let mut lines = vec![
        format!(
            "({}) {}  {}",
            initials(&farmer.first_name, &farmer.last_name),
            farmer.full_name(),
            active_badge(farmer.active)
        ),
        format!("ID: {}", farmer.id),
        format!("Email: {}", farmer.email),
        format!("Phone: {}", farmer.phone_number),
    ];
    if !farmer.address.is_empty() {
        lines.push(format!("Address: {}", farmer.address));
    }
    if !farmer.registration_date.is_empty() {
        lines.push(format!("Registered: {}", format_date(&farmer.registration_date)));
    }
    lines.join("\n")
}

pub fn pump_card(pump: &ConnectedPump) -> String {
    let mut lines = vec![
        format!("{}  {}", pump.model, status_badge(pump.status)),
        format!("ID: {}", pump.id),
        format!("Farm: {}", pump.farm_id),
        format!("Location: {}", pump.location),
        format!("Max flow: {} L/h", pump.max_flow),
        format!("Installed: {}", format_date(&pump.installation_date)),
    ];
    if let Some(last) = &pump.last_maintenance_date {
        lines.push(format!("Last maintenance: {}", format_date(last)));
    }
    if let Some(next) = &pump.next_maintenance_date {
        let overdue = if pump.maintenance_overdue { " (overdue)" } else { "" };
        lines.push(format!("Next maintenance: {}{}", format_date(next), overdue));
    }
    if let Some(notes) = &pump.maintenance_notes {
        lines.push(format!("Notes: {}", notes));
    }
    lines.join("\n")
}

pub fn sensor_card(sensor: &ConnectedSensor) -> String {
    let status = Some(sensor.battery_status.as_str()).filter(|s| !s.is_empty());
    let mut lines = vec![
        format!("{}  {}", sensor.model, active_badge(sensor.active)),
        format!("ID: {}", sensor.id),
        format!("Type: {}", sensor.sensor_type),
        format!("Farm: {}", sensor.farm_id),
        format!("Location: {}", sensor.location),
        format!("Battery: {}", battery_indicator(sensor.battery, status)),
        format!("Online: {}", if sensor.online { "yes" } else { "no" }),
    ];
    if let Some(threshold) = sensor.alert_threshold {
        lines.push(format!("Alert threshold: {}{}", threshold, sensor.unit));
    }
    if !sensor.last_communication.is_empty() {
        lines.push(format!("Last seen: {}", format_date(&sensor.last_communication)));
    }
    lines.join("\n")
}
