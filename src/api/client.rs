//! HTTP client for the MediFlow API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ApiError, PatientApi};
use crate::models::{NewObservation, NewPatient, Observation, Patient};

/// reqwest-backed [`PatientApi`] implementation.
///
/// Deliberately plain: one request per operation, no retry, no client-side
/// timeout. The server is treated as authoritative and nearby; anything that
/// fails is reported immediately rather than papered over.
pub struct MediFlowClient {
    base_url: String,
    client: reqwest::Client,
}

impl MediFlowClient {
    /// Create a client for the given base URL (trailing slash tolerated).
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Client for the base URL from `MEDIFLOW_API_URL`, falling back to the
    /// local development default.
    pub fn from_env() -> Self {
        Self::new(&crate::config::api_base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, &self.base_url))?;

        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn post_json<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, &self.base_url))?;

        // The 201 body (the created record) is discarded: the view layer
        // refetches the authoritative list instead of inserting locally.
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Http {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Body of `GET /`, the API's welcome/health payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiHealth {
    pub message: String,
}

/// Outgoing body for `POST /patients/{id}/observations`.
///
/// The form collects type/value/unit; `patient_id` is attached here.
#[derive(Serialize)]
struct CreateObservationBody<'a> {
    #[serde(rename = "type")]
    observation_type: &'a str,
    value: &'a str,
    unit: &'a str,
    patient_id: &'a str,
}

#[async_trait]
impl PatientApi for MediFlowClient {
    async fn health_check(&self) -> Result<ApiHealth, ApiError> {
        self.get_json("/").await
    }

    async fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.get_json("/patients").await
    }

    async fn list_observations(
        &self,
        patient_id: &str,
    ) -> Result<Vec<Observation>, ApiError> {
        self.get_json(&format!("/patients/{patient_id}/observations"))
            .await
    }

    async fn create_patient(&self, record: &NewPatient) -> Result<(), ApiError> {
        self.post_json("/patients", record).await
    }

    async fn create_observation(
        &self,
        patient_id: &str,
        record: &NewObservation,
    ) -> Result<(), ApiError> {
        let body = CreateObservationBody {
            observation_type: &record.observation_type,
            value: &record.value,
            unit: &record.unit,
            patient_id,
        };
        self.post_json(&format!("/patients/{patient_id}/observations"), &body)
            .await
    }
}
