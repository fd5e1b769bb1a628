/// Text extracted from one capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub text: String,
    pub is_empty: bool,
}

impl RecognitionResult {
    /// Trims surrounding whitespace from raw backend output.
    pub fn from_raw(raw: &str) -> Self {
        let text = raw.trim().to_string();
        let is_empty = text.is_empty();
        Self { text, is_empty }
    }
}

/// Terminal result of one capture-and-recognize run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Success(String),
    EmptyText,
    CaptureFailed(String),
    RecognitionFailed(String),
    ToolUnavailable(String),
}

impl PipelineOutcome {
    /// Short human-readable category for anything but success
    pub fn category(&self) -> String {
        match self {
            PipelineOutcome::Success(_) => "text copied to clipboard".to_string(),
            PipelineOutcome::EmptyText => "no text detected".to_string(),
            PipelineOutcome::CaptureFailed(_) => "capture failed".to_string(),
            PipelineOutcome::RecognitionFailed(_) => "recognition failed".to_string(),
            PipelineOutcome::ToolUnavailable(name) => format!("tool unavailable: {name}"),
        }
    }
}

impl From<RecognitionResult> for PipelineOutcome {
    fn from(result: RecognitionResult) -> Self {
        if result.is_empty {
            PipelineOutcome::EmptyText
        } else {
            PipelineOutcome::Success(result.text)
        }
    }
}
