//! Pure renderers: text projections of the current state.
//!
//! No state of their own. Every function is a function of the snapshot and
//! form it is given, and display order is exactly the order the API
//! returned. Dates are parsed here for friendlier display only; anything
//! unparseable is shown as the server sent it.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::app::{ViewMode, ViewState};
use crate::config;
use crate::forms::{ObservationForm, PatientForm};
use crate::models::{Observation, Patient};

/// Render the full screen for the current mode, modal included.
pub fn render(
    state: &ViewState,
    patient_form: &PatientForm,
    observation_form: &ObservationForm,
) -> String {
    let mut out = format!("== {} ==\n\n", config::APP_NAME);

    if state.loading {
        out.push_str("Loading patients...\n");
        return out;
    }

    // The inline error replaces the list body, as the original screen did.
    if state.mode == ViewMode::List {
        if let Some(error) = &state.error {
            out.push_str(&format!("  ! {error}\n"));
            return out;
        }
    }

    match state.mode {
        ViewMode::List => out.push_str(&patient_list(&state.patients)),
        ViewMode::Detail => match &state.selected {
            Some(patient) => out.push_str(&patient_detail(patient, &state.observations)),
            // Unreachable while the selection invariant holds; show the list.
            None => out.push_str(&patient_list(&state.patients)),
        },
        ViewMode::Add => {
            out.push_str(&add_patient_view(patient_form, state.patient_submit_in_flight));
        }
    }

    if state.observation_modal_open {
        out.push('\n');
        out.push_str(&observation_modal(
            observation_form,
            state.observation_submit_in_flight,
        ));
    }

    out
}

/// The roster, one numbered row per patient in server order.
pub fn patient_list(patients: &[Patient]) -> String {
    let mut out = String::from("Patient Roster\n");
    if patients.is_empty() {
        out.push_str("  No patients found.\n");
        return out;
    }
    for (index, patient) in patients.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} (MRN: {})\n",
            index + 1,
            patient.display_name(),
            patient.mrn
        ));
    }
    out
}

/// One patient's header plus their observations, in server order.
pub fn patient_detail(patient: &Patient, observations: &[Observation]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", patient.display_name()));
    out.push_str(&format!("MRN: {}\n", patient.mrn));
    out.push_str(&format!("DOB: {}\n", format_date(&patient.date_of_birth)));
    out.push_str("\nObservations\n");

    if observations.is_empty() {
        out.push_str("  No observations recorded for this patient.\n");
        return out;
    }
    for observation in observations {
        out.push_str(&format!(
            "  {}: {} {}  ({})\n",
            observation.observation_type,
            observation.value,
            observation.unit,
            format_timestamp(&observation.timestamp)
        ));
    }
    out
}

/// The add-patient form with its current field contents.
pub fn add_patient_view(form: &PatientForm, submitting: bool) -> String {
    let mut out = String::from("Add New Patient\n");
    out.push_str(&format!("  mrn:           {}\n", form.mrn));
    out.push_str(&format!("  first_name:    {}\n", form.first_name));
    out.push_str(&format!("  last_name:     {}\n", form.last_name));
    out.push_str(&format!("  date_of_birth: {}\n", form.date_of_birth));
    out.push_str(if submitting {
        "  Saving...\n"
    } else {
        "  [Save Patient / Cancel]\n"
    });
    out
}

/// The add-observation modal with its current field contents.
pub fn observation_modal(form: &ObservationForm, submitting: bool) -> String {
    let mut out = String::from("Add New Observation\n");
    out.push_str(&format!("  type:  {}\n", form.observation_type));
    out.push_str(&format!("  value: {}\n", form.value));
    out.push_str(&format!("  unit:  {}\n", form.unit));
    out.push_str(if submitting {
        "  Saving...\n"
    } else {
        "  [Save Observation / Cancel]\n"
    });
    out
}

/// Calendar date for display: "1990-01-01" or "1990-01-01T00:00:00" becomes
/// "Jan 01, 1990"; anything else is shown raw.
fn format_date(raw: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%b %d, %Y").to_string();
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return datetime.date().format("%b %d, %Y").to_string();
    }
    raw.to_string()
}

/// Instant for display. The backend emits naive ISO timestamps; RFC 3339 is
/// accepted too in case the service grows timezone awareness.
fn format_timestamp(raw: &str) -> String {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return datetime.format("%b %d, %Y %H:%M").to_string();
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return datetime.format("%b %d, %Y %H:%M").to_string();
    }
    raw.to_string()
}
