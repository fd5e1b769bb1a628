use std::io;

/// Why a single external tool invocation did not produce a result
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{0} not found on PATH")]
    Unavailable(String),

    #[error("{tool} timed out after {secs}s and was killed")]
    Timeout { tool: String, secs: u64 },

    #[error("{tool} exited with {}: {stderr}", describe_exit(.code))]
    Failure {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{tool} produced unusable output: {reason}")]
    Output { tool: String, reason: String },

    #[error("failed to run {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: io::Error,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

impl ToolError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ToolError::Unavailable(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no capture tool succeeded")]
    Exhausted,

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("failed to create temporary capture file: {0}")]
    TempFile(#[source] io::Error),

    #[error("captured image is unusable: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecognitionError {
    #[error("{0} is not available")]
    Unavailable(String),

    #[error("OCR backend failed: {0}")]
    Backend(String),

    #[error("failed to encode image for OCR: {0}")]
    Encode(String),
}
