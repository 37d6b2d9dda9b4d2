//! Runs blocking requests off the UI thread and reports back over a channel.

use crate::client::InferenceClient;
use crate::controller::{PendingSubmission, Settlement};
use crate::error::ClassifyError;
use crate::prediction::HealthStatus;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

/// Run `pending` on its own thread and send the settlement to `sender`.
pub fn spawn_submission(
    client: Arc<dyn InferenceClient>,
    pending: PendingSubmission,
    sender: Sender<Settlement>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let settlement = pending.run(client.as_ref());
        if sender.send(settlement).is_err() {
            tracing::debug!("settlement receiver dropped");
        }
    })
}

/// Query `/health` on its own thread.
pub fn spawn_health_check(
    client: Arc<dyn InferenceClient>,
    sender: Sender<Result<HealthStatus, ClassifyError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        if sender.send(client.health()).is_err() {
            tracing::debug!("health receiver dropped");
        }
    })
}
