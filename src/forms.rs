//! Local input state for the two create flows.
//!
//! Forms own ephemeral input only: fields are set one at a time, the way a
//! browser form mutates on each change event, and converted to a create
//! record on explicit submission. Required-field checks are the only
//! validation; values are otherwise passed to the API verbatim.

use thiserror::Error;

use crate::models::{NewObservation, NewPatient};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Input state for the add-patient view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub mrn: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
}

impl PatientForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update one field by its form name.
    pub fn set(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        match field {
            "mrn" => self.mrn = value.to_string(),
            "first_name" => self.first_name = value.to_string(),
            "last_name" => self.last_name = value.to_string(),
            "date_of_birth" => self.date_of_birth = value.to_string(),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Convert to the create payload. Every field is required.
    pub fn to_record(&self) -> Result<NewPatient, FormError> {
        let required = [
            ("MRN", &self.mrn),
            ("First name", &self.first_name),
            ("Last name", &self.last_name),
            ("Date of birth", &self.date_of_birth),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(FormError::MissingField(name));
            }
        }
        Ok(NewPatient {
            mrn: self.mrn.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            date_of_birth: self.date_of_birth.clone(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Input state for the add-observation modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationForm {
    pub observation_type: String,
    pub value: String,
    pub unit: String,
}

impl ObservationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update one field by its form name ("type", "value", "unit").
    pub fn set(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        match field {
            "type" => self.observation_type = value.to_string(),
            "value" => self.value = value.to_string(),
            "unit" => self.unit = value.to_string(),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Convert to the create payload. Every field is required.
    pub fn to_record(&self) -> Result<NewObservation, FormError> {
        let required = [
            ("Observation type", &self.observation_type),
            ("Value", &self.value),
            ("Unit", &self.unit),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(FormError::MissingField(name));
            }
        }
        Ok(NewObservation {
            observation_type: self.observation_type.clone(),
            value: self.value.clone(),
            unit: self.unit.clone(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
