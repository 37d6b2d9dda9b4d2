use crate::client::InferenceClient;
use crate::error::ClassifyError;
use crate::prediction::PredictionResult;
use crate::selection::SelectedImage;

/// What the page currently shows for the selected image.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Succeeded(PredictionResult),
    /// Single-line message for the user.
    Failed(String),
}

/// A request the controller has accepted but that has not run yet.
///
/// Carries the generation it was issued under so its outcome can be matched
/// against the controller later.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    generation: u64,
    image: SelectedImage,
}

impl PendingSubmission {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn image(&self) -> &SelectedImage {
        &self.image
    }

    /// Perform the request. Blocks until the service answers or the
    /// connection fails.
    pub fn run(self, client: &dyn InferenceClient) -> Settlement {
        let outcome = client.predict(&self.image);
        Settlement {
            generation: self.generation,
            outcome,
        }
    }
}

/// The settled outcome of one request.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub generation: u64,
    pub outcome: Result<PredictionResult, ClassifyError>,
}

/// Owns the submission state machine `Idle -> InFlight -> Succeeded | Failed`.
#[derive(Debug, Default)]
pub struct SubmissionController {
    state: SubmissionState,
    generation: u64,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, SubmissionState::InFlight)
    }

    /// The selection changed. Anything still outstanding becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = SubmissionState::Idle;
    }

    /// Start a submission for `image`.
    ///
    /// Returns `Ok(None)` while a request is already in flight; the caller must
    /// not issue another one.
    pub fn begin(
        &mut self,
        image: Option<&SelectedImage>,
    ) -> Result<Option<PendingSubmission>, ClassifyError> {
        if self.is_in_flight() {
            tracing::debug!("submit ignored, request already in flight");
            return Ok(None);
        }
        let Some(image) = image else {
            let err = ClassifyError::NoFileSelected;
            self.state = SubmissionState::Failed(err.to_string());
            return Err(err);
        };

        self.generation += 1;
        self.state = SubmissionState::InFlight;
        tracing::info!(
            generation = self.generation,
            "submitting {} ({} bytes)",
            image.name(),
            image.bytes().len()
        );
        Ok(Some(PendingSubmission {
            generation: self.generation,
            image: image.clone(),
        }))
    }

    /// Apply a settled outcome. Returns false when it was stale and dropped.
    pub fn settle(&mut self, settlement: Settlement) -> bool {
        if settlement.generation != self.generation || !self.is_in_flight() {
            tracing::debug!(
                stale = settlement.generation,
                current = self.generation,
                "discarding stale prediction outcome"
            );
            return false;
        }

        self.state = match settlement.outcome {
            Ok(result) => SubmissionState::Succeeded(result),
            Err(err) => {
                tracing::warn!("prediction failed: {err}");
                SubmissionState::Failed(err.to_string())
            }
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::test_support::image;

    fn prediction() -> PredictionResult {
        PredictionResult {
            predicted_class: "safe".into(),
            unsafe_score: 0.1,
            probabilities: vec![("safe".into(), 0.9), ("unsafe".into(), 0.1)],
            device: "cpu".into(),
        }
    }

    fn settled(pending: &PendingSubmission, outcome: Result<PredictionResult, ClassifyError>) -> Settlement {
        Settlement {
            generation: pending.generation(),
            outcome,
        }
    }

    #[test]
    fn starts_idle() {
        let controller = SubmissionController::new();
        assert_eq!(controller.state(), &SubmissionState::Idle);
        assert!(!controller.is_in_flight());
    }

    #[test]
    fn submit_without_image_fails_locally() {
        let mut controller = SubmissionController::new();
        let err = controller.begin(None).unwrap_err();
        assert_eq!(err, ClassifyError::NoFileSelected);
        assert_eq!(
            controller.state(),
            &SubmissionState::Failed("Please select an image first.".into())
        );
    }

    #[test]
    fn success_moves_to_succeeded() {
        let mut controller = SubmissionController::new();
        let img = image("a.jpg");
        let pending = controller.begin(Some(&img)).unwrap().unwrap();
        assert!(controller.is_in_flight());
        assert_eq!(pending.image().name(), "a.jpg");

        assert!(controller.settle(settled(&pending, Ok(prediction()))));
        assert_eq!(controller.state(), &SubmissionState::Succeeded(prediction()));
    }

    #[test]
    fn service_failure_moves_to_failed_with_body() {
        let mut controller = SubmissionController::new();
        let img = image("a.jpg");
        let pending = controller.begin(Some(&img)).unwrap().unwrap();

        controller.settle(settled(
            &pending,
            Err(ClassifyError::Service {
                status: 500,
                body: "model not loaded".into(),
            }),
        ));
        match controller.state() {
            SubmissionState::Failed(msg) => assert!(msg.contains("model not loaded")),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn second_begin_while_in_flight_is_a_no_op() {
        let mut controller = SubmissionController::new();
        let img = image("a.jpg");
        let first = controller.begin(Some(&img)).unwrap().unwrap();

        assert!(controller.begin(Some(&img)).unwrap().is_none());
        assert!(controller.begin(None).unwrap().is_none());
        assert!(controller.is_in_flight());

        assert!(controller.settle(settled(&first, Ok(prediction()))));
    }

    #[test]
    fn reset_discards_outstanding_settlement() {
        let mut controller = SubmissionController::new();
        let img = image("a.jpg");
        let pending = controller.begin(Some(&img)).unwrap().unwrap();

        controller.reset();
        assert_eq!(controller.state(), &SubmissionState::Idle);

        assert!(!controller.settle(settled(&pending, Ok(prediction()))));
        assert_eq!(controller.state(), &SubmissionState::Idle);
    }

    #[test]
    fn stale_settlement_does_not_clobber_newer_request() {
        let mut controller = SubmissionController::new();
        let first_img = image("a.jpg");
        let second_img = image("b.jpg");
        let first = controller.begin(Some(&first_img)).unwrap().unwrap();
        controller.reset();
        let second = controller.begin(Some(&second_img)).unwrap().unwrap();

        assert!(!controller.settle(settled(&first, Err(ClassifyError::transport("refused")))));
        assert!(controller.is_in_flight());

        assert!(controller.settle(settled(&second, Ok(prediction()))));
        assert!(matches!(controller.state(), SubmissionState::Succeeded(_)));
    }

    #[test]
    fn duplicate_settlement_is_ignored() {
        let mut controller = SubmissionController::new();
        let img = image("a.jpg");
        let pending = controller.begin(Some(&img)).unwrap().unwrap();

        assert!(controller.settle(settled(&pending, Ok(prediction()))));
        assert!(!controller.settle(settled(
            &pending,
            Err(ClassifyError::transport("late"))
        )));
        assert!(matches!(controller.state(), SubmissionState::Succeeded(_)));
    }

    #[test]
    fn resubmit_after_failure_reenters_in_flight() {
        let mut controller = SubmissionController::new();
        let img = image("a.jpg");
        let pending = controller.begin(Some(&img)).unwrap().unwrap();
        controller.settle(settled(&pending, Err(ClassifyError::transport(""))));
        assert!(matches!(controller.state(), SubmissionState::Failed(_)));

        let retry = controller.begin(Some(&img)).unwrap().unwrap();
        assert!(controller.is_in_flight());
        assert!(retry.generation() > pending.generation());
    }
}
