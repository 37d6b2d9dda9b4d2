//! Client-side core of the posture safety checker: selecting an image,
//! submitting it to the inference service, and turning the answer into
//! something to show.

pub mod client;
pub mod controller;
pub mod error;
pub mod prediction;
pub mod present;
pub mod selection;
pub mod session;
pub mod worker;

pub use client::{ClientConfig, HttpInferenceClient, InferenceClient};
pub use controller::{PendingSubmission, Settlement, SubmissionController, SubmissionState};
pub use error::ClassifyError;
pub use prediction::{HealthStatus, PredictionResult};
pub use present::{ProbabilityRow, ResultView, Risk};
pub use selection::{PreviewFactory, SelectedImage, SelectionStage};
pub use session::Session;
pub use worker::{spawn_health_check, spawn_submission};
