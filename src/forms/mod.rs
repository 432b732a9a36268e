//! Form schemas and the submit flow.
//!
//! A form validates its raw values into a payload. [`submit`] only sends the
//! payload when validation passes, and only calls the success callback when
//! the backend accepted it.

pub mod acknowledge;
pub mod farm;
pub mod farmer;
pub mod filter;
pub mod maintenance;
pub mod pump;
pub mod sensor;

// Re-export commonly used items
pub use acknowledge::AcknowledgeForm;
pub use farm::FarmForm;
pub use farmer::FarmerForm;
pub use filter::{ActiveFilter, FarmerFilter, SortBy, SortOrder};
pub use maintenance::{MaintenanceForm, MaintenancePriority, Recurrence};
pub use pump::PumpForm;
pub use sensor::SensorForm;

use crate::error::{DashboardError, Result};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use tracing::{debug, warn};

/// One message per offending field, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    errors: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless the field already has one.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push((field.to_string(), message.into()));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

/// A form that validates into a payload ready to send.
pub trait FormSchema {
    type Payload: Clone;

    fn validate(&self) -> std::result::Result<Self::Payload, FieldErrors>;
}

/// Result of [`submit`].
#[derive(Debug)]
pub enum SubmitOutcome<T> {
    /// Validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// The request was sent and failed.
    Failed(DashboardError),
    Submitted(T),
}

impl<T> SubmitOutcome<T> {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Submitted(value) => Ok(value),
            Self::Failed(e) => Err(e),
            Self::Invalid(errors) => Err(DashboardError::Validation(errors)),
        }
    }
}

/// Validate `form`, send the payload with `send`, then call `on_success`
/// with the payload if the send succeeded.
pub async fn submit<F, S, Fut, R, C>(form: &F, send: S, on_success: C) -> SubmitOutcome<R>
where
    F: FormSchema,
    S: FnOnce(F::Payload) -> Fut,
    Fut: Future<Output = Result<R>>,
    C: FnOnce(F::Payload),
{
    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => {
            debug!("Form rejected: {}", errors);
            return SubmitOutcome::Invalid(errors);
        }
    };

    match send(payload.clone()).await {
        Ok(response) => {
            on_success(payload);
            SubmitOutcome::Submitted(response)
        }
        Err(e) => {
            warn!("Form submission failed: {}", e);
            SubmitOutcome::Failed(e)
        }
    }
}

/// Check a required text field. Returns the value when it is present.
pub(crate) fn required<'a>(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &'a str,
) -> Option<&'a str> {
    if value.trim().is_empty() {
        errors.add(field, format!("{} is required", label));
        None
    } else {
        Some(value)
    }
}

/// Check a required text field and its length in characters.
pub(crate) fn text_length(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &str,
    min: usize,
    max: Option<usize>,
) {
    let Some(value) = required(errors, field, label, value) else {
        return;
    };
    let len = value.chars().count();
    if len < min {
        errors.add(field, format!("{} must be at least {} characters", label, min));
    } else if let Some(max) = max.filter(|max| len > *max) {
        errors.add(field, format!("{} must not exceed {} characters", label, max));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct NameForm {
        name: String,
    }

    impl FormSchema for NameForm {
        type Payload = String;

        fn validate(&self) -> std::result::Result<String, FieldErrors> {
            let mut errors = FieldErrors::new();
            text_length(&mut errors, "name", "Name", &self.name, 2, Some(5));
            errors.into_result(self.name.clone())
        }
    }

    #[test]
    fn test_text_length_messages() {
        let mut errors = FieldErrors::new();
        text_length(&mut errors, "a", "Name", "", 2, None);
        text_length(&mut errors, "b", "Name", "x", 2, None);
        text_length(&mut errors, "c", "Name", "abcdef", 2, Some(5));
        assert_eq!(errors.get("a"), Some("Name is required"));
        assert_eq!(errors.get("b"), Some("Name must be at least 2 characters"));
        assert_eq!(errors.get("c"), Some("Name must not exceed 5 characters"));
    }

    #[test]
    fn test_first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("email", "Email is required");
        errors.add("email", "Invalid email format");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.to_string(), "email: Email is required");
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let mut sent = false;
        let mut called = false;
        let outcome = submit(
            &NameForm { name: String::new() },
            |_| {
                sent = true;
                async { Ok::<(), DashboardError>(()) }
            },
            |_| called = true,
        )
        .await;
        assert!(outcome.field_errors().unwrap().contains("name"));
        assert!(!sent);
        assert!(!called);
    }

    #[tokio::test]
    async fn test_success_callback_gets_payload() {
        let mut received = None;
        let outcome = submit(
            &NameForm { name: "Kofi".into() },
            |payload| async move { Ok::<_, DashboardError>(payload.len()) },
            |payload| received = Some(payload),
        )
        .await;
        assert!(outcome.is_submitted());
        assert_eq!(outcome.into_result().unwrap(), 4);
        assert_eq!(received.as_deref(), Some("Kofi"));
    }

    #[tokio::test]
    async fn test_failed_send_skips_callback() {
        let mut called = false;
        let outcome = submit(
            &NameForm { name: "Kofi".into() },
            |_| async { Err::<(), _>(DashboardError::api_error(500, "boom")) },
            |_| called = true,
        )
        .await;
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert!(!called);
    }
}
