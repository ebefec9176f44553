use serde::{Deserialize, Serialize};

/// A single timestamped clinical measurement attached to one patient.
///
/// `value` is a string on purpose: the API accepts numeric and categorical
/// readings alike ("85", "Elevated") and the client passes them through
/// untouched. `timestamp` is server-assigned at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "_id")]
    pub id: String,
    pub patient_id: String,
    #[serde(rename = "type")]
    pub observation_type: String,
    pub value: String,
    pub unit: String,
    pub timestamp: String,
}

/// Fields a clinician provides when recording an observation.
///
/// The form collects only these three; the API client attaches the selected
/// patient's id before sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewObservation {
    #[serde(rename = "type")]
    pub observation_type: String,
    pub value: String,
    pub unit: String,
}
