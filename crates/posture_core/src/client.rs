use crate::error::ClassifyError;
use crate::prediction::{HealthStatus, PredictionResult};
use crate::selection::SelectedImage;
use anyhow::{Context, Result};
use reqwest::blocking::multipart::{Form, Part};
use std::time::Duration;

/// Base URL of a locally running inference service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Multipart field the service reads the upload from.
pub const DEFAULT_UPLOAD_FIELD: &str = "file";

/// Where and how to reach the inference service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub upload_field: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            upload_field: DEFAULT_UPLOAD_FIELD.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }
}

/// Remote image classifier.
pub trait InferenceClient: Send + Sync {
    fn predict(&self, image: &SelectedImage) -> Result<PredictionResult, ClassifyError>;

    fn health(&self) -> Result<HealthStatus, ClassifyError>;
}

/// `InferenceClient` speaking HTTP to the posture service.
pub struct HttpInferenceClient {
    base_url: String,
    upload_field: String,
    client: reqwest::blocking::Client,
}

impl HttpInferenceClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        // No client-side timeout: a request ends only when the service answers
        // or the connection drops.
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            upload_field: config.upload_field.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(&self, e: reqwest::Error) -> ClassifyError {
        tracing::warn!("request to {} failed: {e}", self.base_url);
        if e.is_connect() {
            ClassifyError::transport(format!("could not connect to {}", self.base_url))
        } else {
            ClassifyError::transport(e.to_string())
        }
    }

    /// Read the body of a response, turning a non-2xx status into a service
    /// error.
    fn read_body(&self, response: reqwest::blocking::Response) -> Result<String, ClassifyError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!("service returned {status}: {}", body.trim());
            return Err(ClassifyError::Service {
                status: status.as_u16(),
                body,
            });
        }
        response.text().map_err(|e| self.transport_error(e))
    }
}

impl InferenceClient for HttpInferenceClient {
    fn predict(&self, image: &SelectedImage) -> Result<PredictionResult, ClassifyError> {
        let url = format!("{}/predict", self.base_url);
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.name().to_string())
            .mime_str(image.mime())
            .map_err(|e| ClassifyError::transport(e.to_string()))?;
        let form = Form::new().part(self.upload_field.clone(), part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let body = self.read_body(response)?;
        PredictionResult::from_json(&body)
    }

    fn health(&self) -> Result<HealthStatus, ClassifyError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let body = self.read_body(response)?;
        serde_json::from_str(&body).map_err(|e| ClassifyError::MalformedResponse(e.to_string()))
    }
}
