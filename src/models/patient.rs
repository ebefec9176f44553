use serde::{Deserialize, Serialize};

/// A patient record as returned by the MediFlow API.
///
/// `id` is the server-assigned identity (a Mongo ObjectId rendered as a
/// string); `mrn` is the clinic-assigned Medical Record Number. All wire
/// fields stay strings: the client displays what the server sent and never
/// coerces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "_id")]
    pub id: String,
    pub mrn: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
}

impl Patient {
    /// "First Last", as shown in list rows and the detail header.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields a clinician provides when creating a patient.
///
/// Submitted verbatim from the add-patient form; the server assigns the
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    pub mrn: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
}
