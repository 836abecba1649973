use thiserror::Error;

/// Failure modes of one analysis attempt. Every kind is terminal for the
/// attempt; a fresh user action is required to try again.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Analyze was invoked without an uploaded image. Never reaches the
    /// network.
    #[error("no image uploaded")]
    MissingInput,

    /// The call to the model did not complete: send failure, non-success
    /// status, or an unusable response envelope.
    #[error("model request failed: {0}")]
    Transport(String),

    /// The model's reply text is not valid JSON.
    #[error("model reply is not valid JSON: {0}")]
    MalformedResponse(String),

    /// The reply parsed but is missing required fields or does not carry
    /// exactly six matches.
    #[error("model returned an unexpected data format: {0}")]
    UnexpectedFormat(String),
}

impl AnalysisError {
    /// Line shown to the browser. Everything except a missing image
    /// collapses to one generic message; the detailed cause only goes to
    /// the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalysisError::MissingInput => "Please upload an image first.",
            _ => "Could not get a valid response from the AI model.",
        }
    }
}
