//! Sensor create/edit form.

use super::{required, text_length, FieldErrors, FormSchema};
use crate::models::{ConnectedSensor, CreateSensorRequest, SensorType, UpdateSensorRequest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorForm {
    pub farm_id: String,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub model: String,
    /// Percent; kept wide so out-of-range input can be reported
    pub battery: i64,
    pub location: String,
    pub installation_date: String,
    pub alert_threshold: Option<i64>,
}

impl Default for SensorForm {
    fn default() -> Self {
        Self {
            farm_id: String::new(),
            sensor_type: SensorType::default(),
            model: String::new(),
            battery: 100,
            location: String::new(),
            installation_date: String::new(),
            alert_threshold: None,
        }
    }
}

impl SensorForm {
    pub fn new(farm_id: impl Into<String>) -> Self {
        Self {
            farm_id: farm_id.into(),
            ..Default::default()
        }
    }

    pub fn from_sensor(sensor: &ConnectedSensor) -> Self {
        Self {
            farm_id: sensor.farm_id.clone(),
            sensor_type: sensor.sensor_type,
            model: sensor.model.clone(),
            battery: i64::from(sensor.battery),
            location: sensor.location.clone(),
            installation_date: sensor.installation_date.clone(),
            alert_threshold: sensor.alert_threshold.map(i64::from),
        }
    }
}

fn percent(value: i64) -> Option<u8> {
    u8::try_from(value).ok().filter(|v| *v <= 100)
}

impl FormSchema for SensorForm {
    type Payload = CreateSensorRequest;

    fn validate(&self) -> Result<CreateSensorRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "farmId", "Farm", &self.farm_id);
        text_length(&mut errors, "model", "Model", &self.model, 2, None);
        let battery = percent(self.battery);
        if battery.is_none() {
            errors.add("battery", "Battery must be between 0 and 100");
        }
        text_length(&mut errors, "location", "Location", &self.location, 3, None);
        required(
            &mut errors,
            "installationDate",
            "Installation date",
            &self.installation_date,
        );
        let alert_threshold = match self.alert_threshold {
            Some(value) => {
                let threshold = percent(value);
                if threshold.is_none() {
                    errors.add("alertThreshold", "Alert threshold must be between 0 and 100");
                }
                threshold
            }
            None => None,
        };

        errors.into_result(CreateSensorRequest {
            farm_id: self.farm_id.clone(),
            sensor_type: self.sensor_type,
            model: self.model.clone(),
            battery: battery.unwrap_or_default(),
            location: self.location.clone(),
            installation_date: self.installation_date.clone(),
            alert_threshold,
        })
    }
}

impl From<CreateSensorRequest> for UpdateSensorRequest {
    fn from(request: CreateSensorRequest) -> Self {
        Self {
            sensor_type: Some(request.sensor_type),
            model: Some(request.model),
            battery: Some(request.battery),
            location: Some(request.location),
            alert_threshold: request.alert_threshold,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SensorForm {
        SensorForm {
            farm_id: "farm-1".into(),
            sensor_type: SensorType::SoilMoisture,
            model: "SM-20".into(),
            battery: 76,
            location: "Plot 4".into(),
            installation_date: "2024-02-02".into(),
            alert_threshold: Some(30),
        }
    }

    #[test]
    fn test_battery_and_threshold_ranges() {
        let form = SensorForm {
            battery: 101,
            alert_threshold: Some(-1),
            ..valid()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("battery"), Some("Battery must be between 0 and 100"));
        assert_eq!(
            errors.get("alertThreshold"),
            Some("Alert threshold must be between 0 and 100")
        );

        let payload = SensorForm {
            alert_threshold: None,
            ..valid()
        }
        .validate()
        .unwrap();
        assert_eq!(payload.battery, 76);
        assert_eq!(payload.alert_threshold, None);
    }

    #[test]
    fn test_prefill_from_sensor() {
        let sensor = ConnectedSensor {
            farm_id: "farm-2".into(),
            sensor_type: SensorType::Humidity,
            model: "HX-1".into(),
            battery: 12,
            location: "Greenhouse".into(),
            installation_date: "2021-07-07".into(),
            alert_threshold: Some(80),
            ..Default::default()
        };
        let form = SensorForm::from_sensor(&sensor);
        assert_eq!(form.sensor_type, SensorType::Humidity);
        assert_eq!(form.battery, 12);
        assert_eq!(form.alert_threshold, Some(80));
        assert!(form.validate().is_ok());
    }
}
