//! Data Service HTTP client

use crate::ServiceConfig;
use exam_core::{ChartError, ExamQuery, ExamRows, Field, PatientId, decode_exam_rows};
use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("cannot read response from {url}: {message}")]
    Body { url: String, message: String },

    #[error(transparent)]
    Records(#[from] ChartError),
}

/// Only the id is used; other patient columns are ignored
#[derive(Debug, Deserialize)]
struct PatientRow {
    patient_id: PatientId,
}

#[derive(Debug, Clone, Default)]
pub struct ExamServiceClient {
    config: ServiceConfig,
}

impl ExamServiceClient {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub async fn fetch_patients(&self) -> ClientResult<Vec<PatientId>> {
        let url = self.config.url(&self.config.patients_path);
        let body = get_json(&url, &[]).await?;
        decode_patients(body).map_err(|message| ClientError::Body { url, message })
    }

    pub async fn fetch_fields(&self) -> ClientResult<Vec<Field>> {
        let url = self.config.url(&self.config.fields_path);
        let body = get_json(&url, &[]).await?;
        decode_fields(body).map_err(|message| ClientError::Body { url, message })
    }

    /// Records for one validated query; a non-array body is `NoData`
    pub async fn fetch_exams(&self, query: &ExamQuery) -> ClientResult<ExamRows> {
        let url = self.config.url(&self.config.exams_path);
        let body = get_json(&url, &query.params()).await?;
        Ok(decode_exam_rows(body, &query.patient_id)?)
    }
}

async fn get_json(url: &str, params: &[(&'static str, String)]) -> ClientResult<Value> {
    tracing::trace!("GET {}", url);

    let response = Request::get(url)
        .query(params.iter().map(|(k, v)| (*k, v.as_str())))
        .send()
        .await
        .map_err(|e| ClientError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    if !response.ok() {
        return Err(ClientError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    response.json::<Value>().await.map_err(|e| ClientError::Body {
        url: url.to_string(),
        message: e.to_string(),
    })
}

// ============================================================================
// DECODING
// ============================================================================

/// Patient ids from `[{patient_id, ..}]`; anything but an array is no patients
pub fn decode_patients(body: Value) -> Result<Vec<PatientId>, String> {
    if !body.is_array() {
        return Ok(Vec::new());
    }
    let rows: Vec<PatientRow> = serde_json::from_value(body).map_err(|e| e.to_string())?;
    Ok(rows.into_iter().map(|row| row.patient_id).collect())
}

/// Field catalog entries; anything but an array is an empty catalog
pub fn decode_fields(body: Value) -> Result<Vec<Field>, String> {
    if !body.is_array() {
        return Ok(Vec::new());
    }
    serde_json::from_value(body).map_err(|e| e.to_string())
}
