use serde::Serialize;

use crate::error::AnalysisError;
use crate::models::AnalysisResult;

/// Where one analysis cycle currently stands. The outcome variants own
/// their payload; a new upload replaces them wholesale.
#[derive(Debug, Clone)]
pub enum FlowState {
    NoImage,
    ImageReady,
    Analyzing,
    Success(AnalysisResult),
    Failed(String),
}

/// Snapshot handed to the browser via `GET /status`.
#[derive(Clone, Serialize)]
pub struct FlowStatus {
    pub state: String,
    pub message: String,
}

pub struct AnalysisFlow {
    state: FlowState,
}

impl AnalysisFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::NoImage,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// A new upload clears any previous result or error. Ignored while a
    /// call is in flight.
    pub fn image_uploaded(&mut self) {
        if !matches!(self.state, FlowState::Analyzing) {
            self.state = FlowState::ImageReady;
        }
    }

    /// Gate for the analyze action. Without an image this reports
    /// `MissingInput` and the caller must not issue a network call. A
    /// begin while already analyzing stays in `Analyzing`; double
    /// submission is kept out by the UI disabling the control.
    pub fn begin_analysis(&mut self) -> Result<(), AnalysisError> {
        match self.state {
            FlowState::NoImage => Err(AnalysisError::MissingInput),
            _ => {
                self.state = FlowState::Analyzing;
                Ok(())
            }
        }
    }

    pub fn complete(&mut self, result: AnalysisResult) {
        if matches!(self.state, FlowState::Analyzing) {
            self.state = FlowState::Success(result);
        }
    }

    pub fn fail(&mut self, message: String) {
        if matches!(self.state, FlowState::Analyzing) {
            self.state = FlowState::Failed(message);
        }
    }

    pub fn status(&self) -> FlowStatus {
        let (state, message) = match &self.state {
            FlowState::NoImage => ("no_image", "waiting for an upload".to_string()),
            FlowState::ImageReady => ("image_ready", "photo ready to analyze".to_string()),
            FlowState::Analyzing => ("analyzing", "AI is analyzing the photo...".to_string()),
            FlowState::Success(result) => (
                "success",
                format!("{} matches found", result.celebrity_matches.len()),
            ),
            FlowState::Failed(message) => ("failed", message.clone()),
        };

        FlowStatus {
            state: state.to_string(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FacialAnalysis;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            celebrity_matches: Vec::new(),
            facial_analysis: FacialAnalysis {
                fortune: "f".to_string(),
                health: "h".to_string(),
                makeup: "m".to_string(),
            },
        }
    }

    #[test]
    fn analyze_without_an_image_is_refused() {
        let mut flow = AnalysisFlow::new();
        assert!(matches!(flow.state(), FlowState::NoImage));

        let err = flow.begin_analysis().unwrap_err();
        assert!(matches!(err, AnalysisError::MissingInput));
        assert!(matches!(flow.state(), FlowState::NoImage));
    }

    #[test]
    fn upload_then_analyze_reaches_success() {
        let mut flow = AnalysisFlow::new();
        flow.image_uploaded();
        assert!(matches!(flow.state(), FlowState::ImageReady));

        flow.begin_analysis().unwrap();
        assert!(matches!(flow.state(), FlowState::Analyzing));

        flow.complete(sample_result());
        assert!(matches!(flow.state(), FlowState::Success(_)));
    }

    #[test]
    fn failure_attaches_the_message() {
        let mut flow = AnalysisFlow::new();
        flow.image_uploaded();
        flow.begin_analysis().unwrap();
        flow.fail("Could not get a valid response from the AI model.".to_string());

        match flow.state() {
            FlowState::Failed(message) => {
                assert_eq!(message, "Could not get a valid response from the AI model.")
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(flow.status().state, "failed");
    }

    #[test]
    fn upload_clears_a_previous_outcome() {
        let mut flow = AnalysisFlow::new();
        flow.image_uploaded();
        flow.begin_analysis().unwrap();
        flow.fail("nope".to_string());

        flow.image_uploaded();
        assert!(matches!(flow.state(), FlowState::ImageReady));

        flow.begin_analysis().unwrap();
        flow.complete(sample_result());
        flow.image_uploaded();
        assert!(matches!(flow.state(), FlowState::ImageReady));
    }

    #[test]
    fn reanalyze_is_allowed_after_an_outcome_without_reupload() {
        let mut flow = AnalysisFlow::new();
        flow.image_uploaded();
        flow.begin_analysis().unwrap();
        flow.complete(sample_result());

        // The photo is still uploaded; a second attempt starts directly.
        flow.begin_analysis().unwrap();
        assert!(matches!(flow.state(), FlowState::Analyzing));
    }

    #[test]
    fn upload_is_ignored_while_analyzing() {
        let mut flow = AnalysisFlow::new();
        flow.image_uploaded();
        flow.begin_analysis().unwrap();

        flow.image_uploaded();
        assert!(matches!(flow.state(), FlowState::Analyzing));
    }

    #[test]
    fn resolutions_only_apply_while_analyzing() {
        let mut flow = AnalysisFlow::new();
        flow.complete(sample_result());
        assert!(matches!(flow.state(), FlowState::NoImage));

        flow.fail("late".to_string());
        assert!(matches!(flow.state(), FlowState::NoImage));
    }
}
