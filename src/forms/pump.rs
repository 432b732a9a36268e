//! Pump create/edit form.

use super::{required, text_length, FieldErrors, FormSchema};
use crate::models::{ConnectedPump, CreatePumpRequest, EquipmentStatus, UpdatePumpRequest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PumpForm {
    pub farm_id: String,
    pub model: String,
    pub status: EquipmentStatus,
    /// Litres per hour
    pub max_flow: f64,
    pub location: String,
    pub installation_date: String,
}

impl PumpForm {
    pub fn new(farm_id: impl Into<String>) -> Self {
        Self {
            farm_id: farm_id.into(),
            ..Default::default()
        }
    }

    pub fn from_pump(pump: &ConnectedPump) -> Self {
        Self {
            farm_id: pump.farm_id.clone(),
            model: pump.model.clone(),
            status: pump.status,
            max_flow: pump.max_flow,
            location: pump.location.clone(),
            installation_date: pump.installation_date.clone(),
        }
    }
}

impl FormSchema for PumpForm {
    type Payload = CreatePumpRequest;

    fn validate(&self) -> Result<CreatePumpRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "farmId", "Farm", &self.farm_id);
        text_length(&mut errors, "model", "Model", &self.model, 2, None);
        if self.max_flow.is_nan() || self.max_flow < 0.1 {
            errors.add("maxFlow", "Max flow must be greater than 0");
        }
        text_length(&mut errors, "location", "Location", &self.location, 3, None);
        required(
            &mut errors,
            "installationDate",
            "Installation date",
            &self.installation_date,
        );

        errors.into_result(CreatePumpRequest {
            farm_id: self.farm_id.clone(),
            model: self.model.clone(),
            status: self.status,
            max_flow: self.max_flow,
            location: self.location.clone(),
            installation_date: self.installation_date.clone(),
        })
    }
}

impl From<CreatePumpRequest> for UpdatePumpRequest {
    fn from(request: CreatePumpRequest) -> Self {
        Self {
            model: Some(request.model),
            status: Some(request.status),
            max_flow: Some(request.max_flow),
            location: Some(request.location),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pump_rules() {
        let errors = PumpForm::default().validate().unwrap_err();
        assert_eq!(errors.get("farmId"), Some("Farm is required"));
        assert_eq!(errors.get("model"), Some("Model is required"));
        assert_eq!(errors.get("maxFlow"), Some("Max flow must be greater than 0"));
        assert_eq!(errors.get("location"), Some("Location is required"));
        assert_eq!(errors.get("installationDate"), Some("Installation date is required"));

        let form = PumpForm {
            farm_id: "farm-1".into(),
            model: "X".into(),
            status: EquipmentStatus::Maintenance,
            max_flow: 1200.0,
            location: "Block B".into(),
            installation_date: "2023-04-01".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("model"), Some("Model must be at least 2 characters"));
    }

    #[test]
    fn test_prefill_from_pump() {
        let pump = ConnectedPump {
            farm_id: "farm-1".into(),
            model: "AquaMax 300".into(),
            status: EquipmentStatus::Inactive,
            max_flow: 850.0,
            location: "Borehole 2".into(),
            installation_date: "2022-01-10".into(),
            ..Default::default()
        };
        let form = PumpForm::from_pump(&pump);
        assert_eq!(form.status, EquipmentStatus::Inactive);
        let payload = form.validate().unwrap();
        assert_eq!(payload.model, "AquaMax 300");
        assert_eq!(UpdatePumpRequest::from(payload).max_flow, Some(850.0));
    }
}
