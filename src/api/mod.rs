//! MediFlow REST API access.
//!
//! [`PatientApi`] is the seam between the view layer and the network: the
//! production [`MediFlowClient`] speaks HTTP, [`MockApi`] scripts responses
//! for tests. Every call is a single attempt; any failure surfaces to the
//! caller as an [`ApiError`].

mod client;
mod error;
mod mock;

pub use client::{ApiHealth, MediFlowClient};
pub use error::ApiError;
pub use mock::{MockApi, RecordedCall};

use async_trait::async_trait;

use crate::models::{NewObservation, NewPatient, Observation, Patient};

/// The four MediFlow operations, plus the service's welcome/health endpoint.
#[async_trait]
pub trait PatientApi: Send + Sync {
    /// `GET /` - reachability probe, returns the API's welcome payload.
    async fn health_check(&self) -> Result<ApiHealth, ApiError>;

    /// `GET /patients` - the full roster, in server order.
    async fn list_patients(&self) -> Result<Vec<Patient>, ApiError>;

    /// `GET /patients/{id}/observations` - observations for one patient.
    /// Server defines the ordering; the client displays it as received.
    async fn list_observations(&self, patient_id: &str)
        -> Result<Vec<Observation>, ApiError>;

    /// `POST /patients` - create a patient. The created record in the 201
    /// response is discarded; the caller refetches the roster instead.
    async fn create_patient(&self, record: &NewPatient) -> Result<(), ApiError>;

    /// `POST /patients/{id}/observations` - record an observation for the
    /// given patient. The client attaches `patient_id` to the body itself.
    async fn create_observation(
        &self,
        patient_id: &str,
        record: &NewObservation,
    ) -> Result<(), ApiError>;
}
