//! Farmer create/edit form.

use super::{required, text_length, FieldErrors, FormSchema};
use crate::models::{CreateFarmerRequest, Farmer, UpdateFarmerRequest};
use chrono::{Datelike, Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^[0-9+\-\s()]+$").unwrap();
}

pub const MIN_AGE: i32 = 18;
pub const MAX_AGE: i32 = 120;

/// Raw farmer form values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    /// ISO date (`YYYY-MM-DD`)
    pub date_of_birth: String,
    pub active: bool,
}

impl Default for FarmerForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone_number: String::new(),
            address: String::new(),
            date_of_birth: String::new(),
            active: true,
        }
    }
}

impl FarmerForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill from an existing record for editing.
    pub fn from_farmer(farmer: &Farmer) -> Self {
        Self {
            first_name: farmer.first_name.clone(),
            last_name: farmer.last_name.clone(),
            email: farmer.email.clone(),
            phone_number: farmer.phone_number.clone(),
            address: farmer.address.clone(),
            date_of_birth: farmer.date_of_birth.clone(),
            active: farmer.active,
        }
    }

    /// Validate against an explicit "today".
    pub fn validate_on(&self, today: NaiveDate) -> Result<FarmerForm, FieldErrors> {
        let mut errors = FieldErrors::new();

        text_length(&mut errors, "firstName", "First name", &self.first_name, 2, Some(50));
        text_length(&mut errors, "lastName", "Last name", &self.last_name, 2, Some(50));

        if let Some(email) = required(&mut errors, "email", "Email", &self.email) {
            if !EMAIL_RE.is_match(email.trim()) {
                errors.add("email", "Invalid email format");
            }
        }

        if let Some(phone) = required(&mut errors, "phoneNumber", "Phone number", &self.phone_number) {
            if phone.chars().count() < 10 {
                errors.add("phoneNumber", "Phone number must be at least 10 digits");
            } else if !PHONE_RE.is_match(phone) {
                errors.add("phoneNumber", "Invalid phone number format");
            }
        }

        text_length(&mut errors, "address", "Address", &self.address, 5, Some(200));

        if let Some(dob) = required(&mut errors, "dateOfBirth", "Date of birth", &self.date_of_birth) {
            let in_range = age_in_years(dob, today).is_some_and(|age| (MIN_AGE..=MAX_AGE).contains(&age));
            if !in_range {
                errors.add(
                    "dateOfBirth",
                    format!("Farmer must be between {} and {} years old", MIN_AGE, MAX_AGE),
                );
            }
        }

        errors.into_result(self.clone())
    }
}

impl FormSchema for FarmerForm {
    type Payload = FarmerForm;

    fn validate(&self) -> Result<FarmerForm, FieldErrors> {
        self.validate_on(Local::now().date_naive())
    }
}

/// Age as a plain difference of calendar years. `None` if the date does not parse.
pub fn age_in_years(date_of_birth: &str, today: NaiveDate) -> Option<i32> {
    let born = NaiveDate::parse_from_str(date_of_birth.trim(), "%Y-%m-%d").ok()?;
    Some(today.year() - born.year())
}

impl From<FarmerForm> for CreateFarmerRequest {
    fn from(form: FarmerForm) -> Self {
        Self {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            phone_number: form.phone_number,
            address: form.address,
            date_of_birth: form.date_of_birth,
        }
    }
}

impl From<FarmerForm> for UpdateFarmerRequest {
    fn from(form: FarmerForm) -> Self {
        Self {
            first_name: Some(form.first_name),
            last_name: Some(form.last_name),
            email: Some(form.email),
            phone_number: Some(form.phone_number),
            address: Some(form.address),
            date_of_birth: Some(form.date_of_birth),
            active: Some(form.active),
        }
    }
}
