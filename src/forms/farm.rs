//! Farm create/edit form.

use super::{required, text_length, FieldErrors, FormSchema};
use crate::models::{CreateFarmRequest, Farm, UpdateFarmRequest};
use serde::{Deserialize, Serialize};

pub const MIN_FARM_SIZE: f64 = 0.1;
pub const MAX_FARM_SIZE: f64 = 999_999.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmForm {
    pub farmer_id: String,
    pub name: String,
    pub location: String,
    /// Hectares
    pub size: f64,
}

impl FarmForm {
    pub fn new(farmer_id: impl Into<String>) -> Self {
        Self {
            farmer_id: farmer_id.into(),
            ..Default::default()
        }
    }

    pub fn from_farm(farm: &Farm) -> Self {
        Self {
            farmer_id: farm.farmer_id.clone(),
            name: farm.name.clone(),
            location: farm.location.clone(),
            size: farm.size,
        }
    }
}

impl FormSchema for FarmForm {
    type Payload = CreateFarmRequest;

    fn validate(&self) -> Result<CreateFarmRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "farmerId", "Farmer", &self.farmer_id);
        text_length(&mut errors, "name", "Farm name", &self.name, 2, Some(100));
        text_length(&mut errors, "location", "Location", &self.location, 3, Some(200));

        if self.size.is_nan() || self.size < MIN_FARM_SIZE {
            errors.add("size", "Farm size must be greater than 0");
        } else if self.size > MAX_FARM_SIZE {
            errors.add("size", "Farm size is too large");
        }

        errors.into_result(CreateFarmRequest {
            farmer_id: self.farmer_id.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            size: self.size,
        })
    }
}

impl From<CreateFarmRequest> for UpdateFarmRequest {
    fn from(request: CreateFarmRequest) -> Self {
        Self {
            name: Some(request.name),
            location: Some(request.location),
            size: Some(request.size),
        }
    }
}
