//! Messages from the front-end to the view state machine.

use crate::models::{NewObservation, NewPatient};

/// One user intent.
///
/// The rendering layer never mutates state directly: it hands one of these
/// to [`super::App::dispatch`] and re-reads the snapshot afterwards. This
/// keeps the state machine testable with no rendering layer at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Fetch (or refetch) the patient roster. Also the mount action.
    ReloadPatients,
    /// Open the detail view for a patient from the cached roster.
    SelectPatient { patient_id: String },
    OpenAddPatient,
    CancelAddPatient,
    /// Submit the add-patient form's record.
    SubmitPatient { record: NewPatient },
    BackToList,
    OpenObservationModal,
    CloseObservationModal,
    /// Submit the add-observation modal's record for the selected patient.
    SubmitObservation { record: NewObservation },
}
