//! The single state object behind the client UI.

use serde::Serialize;

use crate::models::{Observation, Patient};

/// Top-level navigational mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    List,
    Detail,
    Add,
}

/// Everything the renderers derive their output from.
///
/// Owned by [`super::App`] and mutated only through its named transitions;
/// the front-end only ever sees cloned snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    pub mode: ViewMode,
    /// The roster, in the order the server returned it.
    pub patients: Vec<Patient>,
    /// The patient whose detail view is (or was last) shown. Survives a
    /// return to the list, matching the selection-then-back flow.
    pub selected: Option<Patient>,
    /// Observations for the selected patient, replaced wholesale on fetch.
    pub observations: Vec<Observation>,
    /// True while a patient-list fetch is running.
    pub loading: bool,
    /// Inline fetch error, rendered in the list view. Cleared on each fetch.
    pub error: Option<String>,
    /// The add-observation modal overlays the detail view.
    pub observation_modal_open: bool,
    pub patient_submit_in_flight: bool,
    pub observation_submit_in_flight: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            mode: ViewMode::List,
            patients: Vec::new(),
            selected: None,
            observations: Vec::new(),
            loading: false,
            error: None,
            observation_modal_open: false,
            patient_submit_in_flight: false,
            observation_submit_in_flight: false,
        }
    }

    /// Id of the currently selected patient, if any.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|patient| patient.id.as_str())
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_an_empty_list() {
        let state = ViewState::new();
        assert_eq!(state.mode, ViewMode::List);
        assert!(state.patients.is_empty());
        assert!(state.selected.is_none());
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(!state.observation_modal_open);
    }

    #[test]
    fn selected_id_tracks_selection() {
        let mut state = ViewState::new();
        assert_eq!(state.selected_id(), None);

        state.selected = Some(Patient {
            id: "p1".into(),
            mrn: "M1".into(),
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            date_of_birth: "1990-01-01".into(),
        });
        assert_eq!(state.selected_id(), Some("p1"));
    }

    #[test]
    fn mode_serializes_snake_case() {
        let json = serde_json::to_string(&ViewMode::Detail).unwrap();
        assert_eq!(json, "\"detail\"");
    }
}
