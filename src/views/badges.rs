//! Status, battery and severity badges.

use crate::models::{EquipmentStatus, EventSeverity};
use std::fmt;

/// Colour family of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Gray,
    Yellow,
    Red,
    Blue,
}

impl Tone {
    /// CSS class used by the web dashboard.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Green => "badge-green",
            Self::Gray => "badge-gray",
            Self::Yellow => "badge-yellow",
            Self::Red => "badge-red",
            Self::Blue => "badge-blue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub tone: Tone,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.label)
    }
}

pub fn status_badge(status: EquipmentStatus) -> Badge {
    let tone = match status {
        EquipmentStatus::Active => Tone::Green,
        EquipmentStatus::Inactive => Tone::Gray,
        EquipmentStatus::Maintenance => Tone::Yellow,
    };
    Badge {
        label: status.as_str().to_string(),
        tone,
    }
}

pub fn active_badge(active: bool) -> Badge {
    if active {
        Badge {
            label: "Active".to_string(),
            tone: Tone::Green,
        }
    } else {
        Badge {
            label: "Inactive".to_string(),
            tone: Tone::Gray,
        }
    }
}

pub fn severity_badge(severity: EventSeverity) -> Badge {
    let tone = match severity {
        EventSeverity::Critical => Tone::Red,
        EventSeverity::Warning => Tone::Yellow,
        EventSeverity::Info => Tone::Blue,
    };
    Badge {
        label: severity.as_str().to_string(),
        tone,
    }
}

/// Battery health as shown by colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryLevel {
    Critical,
    Low,
    Good,
}

impl BatteryLevel {
    /// Classify by percentage, letting a server `CRITICAL`/`LOW` status win.
    pub fn classify(level: u8, status: Option<&str>) -> Self {
        let status = status.map(str::trim).unwrap_or_default();
        if status.eq_ignore_ascii_case("CRITICAL") || level < 20 {
            Self::Critical
        } else if status.eq_ignore_ascii_case("LOW") || level < 50 {
            Self::Low
        } else {
            Self::Good
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Critical => Tone::Red,
            Self::Low => Tone::Yellow,
            Self::Good => Tone::Green,
        }
    }
}

/// Battery icon tier, by percentage only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryIcon {
    Warning,
    Low,
    Half,
    Full,
}

impl BatteryIcon {
    pub fn for_level(level: u8) -> Self {
        match level {
            0..=19 => Self::Warning,
            20..=49 => Self::Low,
            50..=79 => Self::Half,
            _ => Self::Full,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Warning => "▁",
            Self::Low => "▃",
            Self::Half => "▅",
            Self::Full => "█",
        }
    }
}

/// "▅ 76% (good)"
pub fn battery_indicator(level: u8, status: Option<&str>) -> String {
    let class = match BatteryLevel::classify(level, status) {
        BatteryLevel::Critical => "critical",
        BatteryLevel::Low => "low",
        BatteryLevel::Good => "good",
    };
    format!("{} {}% ({})", BatteryIcon::for_level(level).glyph(), level, class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_thresholds() {
        assert_eq!(BatteryLevel::classify(19, None), BatteryLevel::Critical);
        assert_eq!(BatteryLevel::classify(20, None), BatteryLevel::Low);
        assert_eq!(BatteryLevel::classify(49, Some("GOOD")), BatteryLevel::Low);
        assert_eq!(BatteryLevel::classify(50, None), BatteryLevel::Good);
        assert_eq!(BatteryLevel::classify(90, Some("CRITICAL")), BatteryLevel::Critical);
        assert_eq!(BatteryLevel::classify(90, Some("LOW")), BatteryLevel::Low);
    }

    #[test]
    fn test_battery_icon_tiers() {
        assert_eq!(BatteryIcon::for_level(5), BatteryIcon::Warning);
        assert_eq!(BatteryIcon::for_level(30), BatteryIcon::Low);
        assert_eq!(BatteryIcon::for_level(79), BatteryIcon::Half);
        assert_eq!(BatteryIcon::for_level(80), BatteryIcon::Full);
        assert_eq!(battery_indicator(76, None), "▅ 76% (good)");
    }

    #[test]
    fn test_badges() {
        assert_eq!(status_badge(EquipmentStatus::Maintenance).tone, Tone::Yellow);
        assert_eq!(status_badge(EquipmentStatus::Active).to_string(), "[ACTIVE]");
        assert_eq!(severity_badge(EventSeverity::Critical).tone.css_class(), "badge-red");
        assert_eq!(active_badge(false).label, "Inactive");
    }
}
