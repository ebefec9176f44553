//! Wire-level domain types for the MediFlow API.

mod observation;
mod patient;

pub use observation::{NewObservation, Observation};
pub use patient::{NewPatient, Patient};
