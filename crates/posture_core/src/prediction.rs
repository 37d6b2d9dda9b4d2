use crate::error::ClassifyError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// JSON body of a successful `/predict` call, exactly as the service sends it.
#[derive(Debug, Deserialize)]
struct PredictionPayload {
    predicted_class: String,
    unsafe_score: f64,
    /// Keeps the service's key order (`preserve_order`).
    probabilities: Map<String, Value>,
    device: String,
}

/// Normalized prediction returned by `from_json` after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Class name as reported; compare case-insensitively.
    pub predicted_class: String,
    /// Probability in [0,1] that the posture is unsafe.
    pub unsafe_score: f64,
    /// Class name and probability in [0,1], in the order the service sent
    /// them. Class names are unique.
    pub probabilities: Vec<(String, f64)>,
    /// Compute backend the service ran on, e.g. `cpu` or `cuda:0`.
    pub device: String,
}

impl PredictionResult {
    /// Decode and validate a success body.
    pub fn from_json(body: &str) -> Result<Self, ClassifyError> {
        let payload: PredictionPayload = serde_json::from_str(body)
            .map_err(|e| ClassifyError::MalformedResponse(e.to_string()))?;
        Self::validate(payload)
    }

    /// Probability reported for `class`, if the service listed it.
    pub fn probability(&self, class: &str) -> Option<f64> {
        self.probabilities
            .iter()
            .find(|(name, _)| name == class)
            .map(|(_, value)| *value)
    }

    fn validate(payload: PredictionPayload) -> Result<Self, ClassifyError> {
        if payload.predicted_class.trim().is_empty() {
            return Err(malformed("predicted_class is empty"));
        }
        check_unit_interval("unsafe_score", payload.unsafe_score)?;

        let mut probabilities = Vec::with_capacity(payload.probabilities.len());
        for (class, value) in payload.probabilities {
            let field = format!("probabilities[{class}]");
            let Some(value) = value.as_f64() else {
                return Err(malformed(&format!("{field} is not a number")));
            };
            check_unit_interval(&field, value)?;
            probabilities.push((class, value));
        }

        Ok(Self {
            predicted_class: payload.predicted_class,
            unsafe_score: payload.unsafe_score,
            probabilities,
            device: payload.device,
        })
    }
}

fn check_unit_interval(field: &str, value: f64) -> Result<(), ClassifyError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(malformed(&format!("{field} out of range: {value}")))
    }
}

fn malformed(reason: &str) -> ClassifyError {
    ClassifyError::MalformedResponse(reason.to_string())
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub device: String,
    pub num_classes: usize,
    pub class_names: Vec<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
