//! Scripted API double for view-layer tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{ApiError, ApiHealth, PatientApi};
use crate::models::{NewObservation, NewPatient, Observation, Patient};

/// A call served by [`MockApi`], recorded for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    HealthCheck,
    ListPatients,
    ListObservations {
        patient_id: String,
    },
    CreatePatient {
        record: NewPatient,
    },
    CreateObservation {
        patient_id: String,
        record: NewObservation,
    },
}

/// In-memory [`PatientApi`] with scripted responses.
///
/// Successful creates persist into the scripted data, so the refetch that
/// follows a write sees the new record the way the real server would show
/// it. Failure switches and per-call latencies drive the request-lifecycle
/// paths that a live server cannot produce on demand.
pub struct MockApi {
    patients: Mutex<Vec<Patient>>,
    observations: Mutex<HashMap<String, Vec<Observation>>>,
    calls: Mutex<Vec<RecordedCall>>,
    next_id: AtomicU64,
    fail_list_patients: AtomicBool,
    fail_list_observations: AtomicBool,
    fail_create_patient: AtomicBool,
    fail_create_observation: AtomicBool,
    observation_fetch_delays: Mutex<HashMap<String, Duration>>,
    create_patient_delay: Mutex<Option<Duration>>,
    create_observation_delay: Mutex<Option<Duration>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            patients: Mutex::new(Vec::new()),
            observations: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            fail_list_patients: AtomicBool::new(false),
            fail_list_observations: AtomicBool::new(false),
            fail_create_patient: AtomicBool::new(false),
            fail_create_observation: AtomicBool::new(false),
            observation_fetch_delays: Mutex::new(HashMap::new()),
            create_patient_delay: Mutex::new(None),
            create_observation_delay: Mutex::new(None),
        }
    }

    // ── Scripting ───────────────────────────────────────────

    pub fn with_patients(self, patients: Vec<Patient>) -> Self {
        *self.patients.lock().expect("mock lock poisoned") = patients;
        self
    }

    pub fn with_observations(self, patient_id: &str, observations: Vec<Observation>) -> Self {
        self.observations
            .lock()
            .expect("mock lock poisoned")
            .insert(patient_id.to_string(), observations);
        self
    }

    /// Delay every observation fetch for `patient_id` by `delay`.
    pub fn with_observation_fetch_delay(self, patient_id: &str, delay: Duration) -> Self {
        self.observation_fetch_delays
            .lock()
            .expect("mock lock poisoned")
            .insert(patient_id.to_string(), delay);
        self
    }

    pub fn with_create_patient_delay(self, delay: Duration) -> Self {
        *self.create_patient_delay.lock().expect("mock lock poisoned") = Some(delay);
        self
    }

    pub fn with_create_observation_delay(self, delay: Duration) -> Self {
        *self.create_observation_delay.lock().expect("mock lock poisoned") = Some(delay);
        self
    }

    pub fn set_fail_list_patients(&self, fail: bool) {
        self.fail_list_patients.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_list_observations(&self, fail: bool) {
        self.fail_list_observations.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_create_patient(&self, fail: bool) {
        self.fail_create_patient.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_create_observation(&self, fail: bool) {
        self.fail_create_observation.store(fail, Ordering::SeqCst);
    }

    // ── Assertions ──────────────────────────────────────────

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock lock poisoned").clone()
    }

    /// How many observation fetches were issued for `patient_id`.
    pub fn observation_fetches(&self, patient_id: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| {
                matches!(call, RecordedCall::ListObservations { patient_id: id } if id == patient_id)
            })
            .count()
    }

    /// How many create-patient attempts were issued.
    pub fn create_patient_attempts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, RecordedCall::CreatePatient { .. }))
            .count()
    }

    // ── Internal ────────────────────────────────────────────

    fn record(&self, call: RecordedCall) {
        self.calls.lock().expect("mock lock poisoned").push(call);
    }

    fn connection_error() -> ApiError {
        ApiError::Connection("http://mock.invalid".to_string())
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PatientApi for MockApi {
    async fn health_check(&self) -> Result<ApiHealth, ApiError> {
        self.record(RecordedCall::HealthCheck);
        Ok(ApiHealth {
            message: "Welcome to the MediFlow API.".to_string(),
        })
    }

    async fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.record(RecordedCall::ListPatients);
        if self.fail_list_patients.load(Ordering::SeqCst) {
            return Err(Self::connection_error());
        }
        Ok(self.patients.lock().expect("mock lock poisoned").clone())
    }

    async fn list_observations(
        &self,
        patient_id: &str,
    ) -> Result<Vec<Observation>, ApiError> {
        self.record(RecordedCall::ListObservations {
            patient_id: patient_id.to_string(),
        });
        let delay = self
            .observation_fetch_delays
            .lock()
            .expect("mock lock poisoned")
            .get(patient_id)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_list_observations.load(Ordering::SeqCst) {
            return Err(Self::connection_error());
        }
        Ok(self
            .observations
            .lock()
            .expect("mock lock poisoned")
            .get(patient_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_patient(&self, record: &NewPatient) -> Result<(), ApiError> {
        self.record(RecordedCall::CreatePatient {
            record: record.clone(),
        });
        let delay = *self.create_patient_delay.lock().expect("mock lock poisoned");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_create_patient.load(Ordering::SeqCst) {
            return Err(Self::connection_error());
        }
        let id = format!("new-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.patients.lock().expect("mock lock poisoned").push(Patient {
            id,
            mrn: record.mrn.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            date_of_birth: record.date_of_birth.clone(),
        });
        Ok(())
    }

    async fn create_observation(
        &self,
        patient_id: &str,
        record: &NewObservation,
    ) -> Result<(), ApiError> {
        self.record(RecordedCall::CreateObservation {
            patient_id: patient_id.to_string(),
            record: record.clone(),
        });
        let delay = *self
            .create_observation_delay
            .lock()
            .expect("mock lock poisoned");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_create_observation.load(Ordering::SeqCst) {
            return Err(Self::connection_error());
        }
        let id = format!("new-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let observation = Observation {
            id,
            patient_id: patient_id.to_string(),
            observation_type: record.observation_type.clone(),
            value: record.value.clone(),
            unit: record.unit.clone(),
            timestamp: "2026-01-15T09:30:00".to_string(),
        };
        self.observations
            .lock()
            .expect("mock lock poisoned")
            .entry(patient_id.to_string())
            .or_default()
            .push(observation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_patient() -> NewPatient {
        NewPatient {
            mrn: "M2".into(),
            first_name: "Bo".into(),
            last_name: "Kim".into(),
            date_of_birth: "1985-05-05".into(),
        }
    }

    #[tokio::test]
    async fn create_persists_into_the_roster() {
        let mock = MockApi::new();
        mock.create_patient(&new_patient()).await.unwrap();
        let patients = mock.list_patients().await.unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].mrn, "M2");
        assert!(patients[0].id.starts_with("new-"));
    }

    #[tokio::test]
    async fn failure_switch_rejects_without_persisting() {
        let mock = MockApi::new();
        mock.set_fail_create_patient(true);
        assert!(mock.create_patient(&new_patient()).await.is_err());
        assert_eq!(mock.create_patient_attempts(), 1);

        mock.set_fail_create_patient(false);
        assert!(mock.create_patient(&new_patient()).await.is_ok());
        assert_eq!(mock.list_patients().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn observation_fetches_are_scoped_and_counted() {
        let mock = MockApi::new();
        mock.list_observations("p1").await.unwrap();
        mock.list_observations("p1").await.unwrap();
        mock.list_observations("p2").await.unwrap();
        assert_eq!(mock.observation_fetches("p1"), 2);
        assert_eq!(mock.observation_fetches("p2"), 1);
    }
}
