use thiserror::Error;

/// Everything that can end a submission in the `Failed` state.
///
/// The `Display` text is what the user sees, so every variant renders as a
/// single line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// Submit was triggered without a selected image. Never reaches the network.
    #[error("Please select an image first.")]
    NoFileSelected,

    /// Connection refused, interrupted transfer, and similar.
    #[error("Prediction failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("{}", service_message(.status, .body))]
    Service { status: u16, body: String },

    /// A 2xx answer whose body does not match the prediction contract.
    #[error("Malformed prediction response: {0}")]
    MalformedResponse(String),
}

impl ClassifyError {
    pub(crate) fn transport(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if detail.trim().is_empty() {
            ClassifyError::Transport("unknown error".to_string())
        } else {
            ClassifyError::Transport(detail)
        }
    }
}

/// First non-blank line of the body, or the status when there is none.
fn service_message(status: &u16, body: &str) -> String {
    match body.lines().map(str::trim).find(|line| !line.is_empty()) {
        Some(line) => line.to_string(),
        None => format!("HTTP error {status}"),
    }
}
