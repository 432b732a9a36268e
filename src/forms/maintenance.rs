//! Maintenance scheduling form.

use super::{required, text_length, FieldErrors, FormSchema};
use crate::models::MaintenanceRequest;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenancePriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl MaintenancePriority {
    pub const ALL: [MaintenancePriority; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for MaintenancePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recurrence {
    #[default]
    None,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Recurrence {
    pub const ALL: [Recurrence; 5] = [
        Self::None,
        Self::Weekly,
        Self::Monthly,
        Self::Quarterly,
        Self::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Quarterly => "QUARTERLY",
            Self::Yearly => "YEARLY",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maintenance form values.
///
/// Only the date and description reach the backend: the description is sent
/// as the request's notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceForm {
    pub equipment_id: String,
    pub scheduled_date: String,
    pub description: String,
    /// Hours
    pub estimated_duration: f64,
    pub priority: MaintenancePriority,
    pub recurrence: Recurrence,
    pub notes: Option<String>,
}

impl Default for MaintenanceForm {
    fn default() -> Self {
        Self {
            equipment_id: String::new(),
            scheduled_date: String::new(),
            description: String::new(),
            estimated_duration: 2.0,
            priority: MaintenancePriority::Medium,
            recurrence: Recurrence::None,
            notes: None,
        }
    }
}

impl MaintenanceForm {
    pub fn new(equipment_id: impl Into<String>) -> Self {
        Self {
            equipment_id: equipment_id.into(),
            ..Default::default()
        }
    }
}

impl FormSchema for MaintenanceForm {
    type Payload = MaintenanceRequest;

    fn validate(&self) -> Result<MaintenanceRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "equipmentId", "Equipment", &self.equipment_id);
        required(&mut errors, "scheduledDate", "Scheduled date", &self.scheduled_date);
        text_length(&mut errors, "description", "Description", &self.description, 10, None);
        if self.estimated_duration.is_nan() || self.estimated_duration < 1.0 {
            errors.add("estimatedDuration", "Duration must be at least 1 hour");
        }

        errors.into_result(MaintenanceRequest {
            scheduled_date: self.scheduled_date.clone(),
            notes: Some(self.description.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_dialog() {
        let form = MaintenanceForm::new("p-1");
        assert_eq!(form.estimated_duration, 2.0);
        assert_eq!(form.priority, MaintenancePriority::Medium);
        assert_eq!(form.recurrence, Recurrence::None);
    }

    #[test]
    fn test_description_becomes_notes() {
        let form = MaintenanceForm {
            scheduled_date: "2024-07-01T09:00".into(),
            description: "Replace impeller seals".into(),
            notes: Some("bring spare gasket".into()),
            ..MaintenanceForm::new("p-1")
        };
        let request = form.validate().unwrap();
        assert_eq!(request.scheduled_date, "2024-07-01T09:00");
        assert_eq!(request.notes.as_deref(), Some("Replace impeller seals"));
    }

    #[test]
    fn test_maintenance_rules() {
        let form = MaintenanceForm {
            description: "short".into(),
            estimated_duration: 0.5,
            ..MaintenanceForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("equipmentId"), Some("Equipment is required"));
        assert_eq!(errors.get("scheduledDate"), Some("Scheduled date is required"));
        assert_eq!(
            errors.get("description"),
            Some("Description must be at least 10 characters")
        );
        assert_eq!(
            errors.get("estimatedDuration"),
            Some("Duration must be at least 1 hour")
        );
        assert_eq!(MaintenancePriority::parse("urgent"), Some(MaintenancePriority::Urgent));
        assert_eq!(Recurrence::parse("Quarterly"), Some(Recurrence::Quarterly));
    }
}
