//! Event acknowledgement form.

use super::{required, FieldErrors, FormSchema};
use crate::models::AcknowledgeEventRequest;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcknowledgeForm {
    pub acknowledged_by: String,
    pub notes: Option<String>,
}

impl AcknowledgeForm {
    pub fn new(acknowledged_by: impl Into<String>) -> Self {
        Self {
            acknowledged_by: acknowledged_by.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

impl FormSchema for AcknowledgeForm {
    type Payload = AcknowledgeEventRequest;

    fn validate(&self) -> Result<AcknowledgeEventRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "acknowledgedBy", "Acknowledged by", &self.acknowledged_by);
        errors.into_result(AcknowledgeEventRequest {
            acknowledged_by: self.acknowledged_by.trim().to_string(),
            notes: self.notes.clone().filter(|n| !n.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acknowledged_by_is_required() {
        let errors = AcknowledgeForm::new("  ").validate().unwrap_err();
        assert_eq!(errors.get("acknowledgedBy"), Some("Acknowledged by is required"));

        let request = AcknowledgeForm::new("ops-team")
            .with_notes("Acknowledged from dashboard")
            .validate()
            .unwrap();
        assert_eq!(request.acknowledged_by, "ops-team");
        assert_eq!(request.notes.as_deref(), Some("Acknowledged from dashboard"));
    }
}
