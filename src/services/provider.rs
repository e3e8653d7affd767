//! FASHN try-on API client.
//!
//! The provider exposes an asynchronous run/status pair: `POST /v1/run`
//! accepts the reference and garment images and returns a prediction id,
//! `GET /v1/status/{id}` reports job progress. Neither response schema is
//! contractually fixed, so the id is extracted across the field spellings
//! observed in the wild and status payloads are classified leniently.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};

use crate::models::generation::ImageRef;
use crate::services::poller::StatusSnapshot;

/// Field names under which the provider has been observed to return the
/// job identifier.
const JOB_ID_FIELDS: &[&str] = &["id", "prediction_id", "predictionId"];

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("submission rejected: {status} - {body}")]
    Submit { status: u16, body: String },

    #[error("status check failed: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("no prediction id in submission response")]
    MissingJobId,
}

/// Seam over the remote try-on API so orchestration can run against a
/// scripted provider in tests.
#[async_trait]
pub trait TryOnProvider: Send + Sync {
    /// Submit one generation job; returns the provider's job identifier.
    async fn submit(
        &self,
        model_image: &str,
        garment_image: &ImageRef,
    ) -> Result<String, ProviderError>;

    /// Fetch one status observation for a previously submitted job.
    async fn status(&self, prediction_id: &str) -> Result<StatusSnapshot, ProviderError>;
}

pub struct FashnClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl FashnClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TryOnProvider for FashnClient {
    async fn submit(
        &self,
        model_image: &str,
        garment_image: &ImageRef,
    ) -> Result<String, ProviderError> {
        let garment_uri = garment_image.to_uri();
        let body = json!({
            "model": "tryon-v1.6",
            "input": {
                "model_image": model_image,
                "garment_image": garment_uri,
                // some API revisions read these spellings instead
                "person_image": model_image,
                "clothing_image": garment_uri,
            }
        });

        let response = self
            .http
            .post(format!("{}/v1/run", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Submit {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let payload: Value = response.json().await?;
        extract_prediction_id(&payload).ok_or(ProviderError::MissingJobId)
    }

    async fn status(&self, prediction_id: &str) -> Result<StatusSnapshot, ProviderError> {
        let response = self
            .http
            .get(format!("{}/v1/status/{}", self.base_url, prediction_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let payload: Value = response.json().await?;
        Ok(StatusSnapshot::from_payload(payload))
    }
}

fn extract_prediction_id(payload: &Value) -> Option<String> {
    JOB_ID_FIELDS
        .iter()
        .find_map(|field| payload.get(field).and_then(Value::as_str))
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
}

/// Outcome of a reference-image reachability probe.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub url: String,
    pub accessible: bool,
    pub status: Option<u16>,
    pub error: Option<String>,
}

/// Best-effort HEAD request against a reference image URL, bounded by
/// `timeout`. Purely diagnostic: a failed probe never blocks submission —
/// the provider reports its own errors authoritatively.
pub async fn probe_reference(http: &Client, url: &str, timeout: Duration) -> ProbeReport {
    match http.head(url).timeout(timeout).send().await {
        Ok(response) => ProbeReport {
            url: url.to_string(),
            accessible: response.status().is_success(),
            status: Some(response.status().as_u16()),
            error: None,
        },
        Err(err) => ProbeReport {
            url: url.to_string(),
            accessible: false,
            status: None,
            error: Some(err.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prediction_id_field_spellings() {
        assert_eq!(
            extract_prediction_id(&json!({"id": "abc"})).as_deref(),
            Some("abc")
        );
        assert_eq!(
            extract_prediction_id(&json!({"prediction_id": "def"})).as_deref(),
            Some("def")
        );
        assert_eq!(
            extract_prediction_id(&json!({"predictionId": "ghi"})).as_deref(),
            Some("ghi")
        );
        // first spelling wins
        assert_eq!(
            extract_prediction_id(&json!({"id": "abc", "prediction_id": "def"})).as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_missing_or_blank_id_is_none() {
        assert!(extract_prediction_id(&json!({"status": "ok"})).is_none());
        assert!(extract_prediction_id(&json!({"id": ""})).is_none());
        assert!(extract_prediction_id(&json!({"id": 42})).is_none());
    }
}
