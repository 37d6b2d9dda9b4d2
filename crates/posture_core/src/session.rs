use crate::controller::{PendingSubmission, Settlement, SubmissionController, SubmissionState};
use crate::error::ClassifyError;
use crate::present::ResultView;
use crate::selection::{PreviewFactory, SelectedImage, SelectionStage};

/// One page worth of state: the selected image and its submission.
///
/// All writes go through `select_file`, `submit` and `settle`.
pub struct Session<F: PreviewFactory> {
    selection: SelectionStage<F>,
    controller: SubmissionController,
}

impl<F: PreviewFactory> Session<F> {
    pub fn new(previews: F) -> Self {
        Self {
            selection: SelectionStage::new(previews),
            controller: SubmissionController::new(),
        }
    }

    /// Replace or clear the selected image. Any shown result or error is
    /// dropped and an outstanding request will be ignored when it settles.
    pub fn select_file(&mut self, input: Option<SelectedImage>) {
        self.selection.select(input);
        self.controller.reset();
    }

    /// Accept a submission for the current image.
    ///
    /// `Ok(None)` means a request is already in flight and nothing must be
    /// sent.
    pub fn submit(&mut self) -> Result<Option<PendingSubmission>, ClassifyError> {
        self.controller.begin(self.selection.image())
    }

    /// Feed back the outcome of a request issued by `submit`.
    pub fn settle(&mut self, settlement: Settlement) -> bool {
        self.controller.settle(settlement)
    }

    pub fn state(&self) -> &SubmissionState {
        self.controller.state()
    }

    pub fn is_in_flight(&self) -> bool {
        self.controller.is_in_flight()
    }

    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selection.image()
    }

    pub fn preview(&self) -> Option<&F::Preview> {
        self.selection.preview()
    }

    /// Presenter output, only while a result is shown.
    pub fn view(&self) -> Option<ResultView> {
        match self.controller.state() {
            SubmissionState::Succeeded(result) => Some(ResultView::new(result)),
            _ => None,
        }
    }

    /// Message for the inline error line, if any.
    pub fn error_message(&self) -> Option<&str> {
        match self.controller.state() {
            SubmissionState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}
