use std::sync::Mutex;

use quickocr_types::{Notification, NotificationLevel, PipelineOutcome};

use crate::clipboard::{Clipboard, ClipboardHold};

pub const PREVIEW_CHARS: usize = 100;

/// What the caller shows the user once a run is over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub outcome: PipelineOutcome,
    /// Text preview on success, otherwise the failure category
    pub summary: String,
    pub detail: Option<String>,
    pub copied: bool,
}

impl DeliveryReport {
    pub fn notification(&self) -> Notification {
        match (&self.outcome, self.copied) {
            (PipelineOutcome::Success(_), true) => Notification {
                title: "OCR Success".to_string(),
                body: format!("Text copied to clipboard:\n{}", self.summary),
                level: NotificationLevel::Info,
            },
            (PipelineOutcome::EmptyText, _) => Notification {
                title: "OCR Result".to_string(),
                body: "No text detected".to_string(),
                level: NotificationLevel::Warning,
            },
            _ => Notification {
                title: "OCR Error".to_string(),
                body: match &self.detail {
                    Some(detail) => format!("{}: {detail}", self.summary),
                    None => self.summary.clone(),
                },
                level: NotificationLevel::Error,
            },
        }
    }
}

/// First [`PREVIEW_CHARS`] characters, with `...` when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Delivers recognized text to the clipboard
pub struct ResultSink {
    clipboard: Mutex<Box<dyn Clipboard>>,
}

impl ResultSink {
    pub fn new(clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            clipboard: Mutex::new(clipboard),
        }
    }

    /// Owner of the last delivered text, for callers that exit right after delivering
    pub fn take_hold(&self) -> Option<ClipboardHold> {
        match self.clipboard.lock() {
            Ok(mut clipboard) => clipboard.take_hold(),
            Err(_) => None,
        }
    }

    /// Only a successful outcome touches the clipboard
    pub fn deliver(&self, outcome: PipelineOutcome) -> DeliveryReport {
        let text = match &outcome {
            PipelineOutcome::Success(text) => text.clone(),
            other => {
                let detail = match other {
                    PipelineOutcome::CaptureFailed(reason)
                    | PipelineOutcome::RecognitionFailed(reason) => Some(reason.clone()),
                    _ => None,
                };
                tracing::warn!("OCR run ended: {}", other.category());
                return DeliveryReport {
                    summary: other.category(),
                    outcome,
                    detail,
                    copied: false,
                };
            }
        };

        let written = match self.clipboard.lock() {
            Ok(mut clipboard) => clipboard.set_text(&text).map_err(|e| e.to_string()),
            Err(_) => Err("clipboard lock poisoned".to_string()),
        };

        let summary = preview(&text, PREVIEW_CHARS);
        match written {
            Ok(()) => {
                tracing::info!("copied {} chars to clipboard", text.chars().count());
                DeliveryReport {
                    outcome,
                    summary,
                    detail: None,
                    copied: true,
                }
            }
            Err(e) => {
                tracing::error!("clipboard write failed: {e}");
                DeliveryReport {
                    outcome,
                    summary: "clipboard write failed".to_string(),
                    detail: Some(e),
                    copied: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::clipboard::ClipboardError;

    #[derive(Clone, Default)]
    struct MemoryClipboard {
        contents: Arc<Mutex<Option<String>>>,
        writes: Arc<Mutex<usize>>,
        broken: bool,
    }

    impl Clipboard for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            *self.writes.lock().unwrap() += 1;
            if self.broken {
                return Err(ClipboardError("no display".to_string()));
            }
            *self.contents.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    fn sink_with(clipboard: &MemoryClipboard) -> ResultSink {
        ResultSink::new(Box::new(clipboard.clone()))
    }

    #[test]
    fn success_writes_clipboard() {
        let clipboard = MemoryClipboard::default();
        let report =
            sink_with(&clipboard).deliver(PipelineOutcome::Success("Hello World".to_string()));

        assert!(report.copied);
        assert_eq!(report.summary, "Hello World");
        assert_eq!(
            clipboard.contents.lock().unwrap().as_deref(),
            Some("Hello World")
        );
        assert_eq!(report.notification().title, "OCR Success");
    }

    #[test]
    fn empty_and_failures_leave_clipboard_untouched() {
        let clipboard = MemoryClipboard::default();
        *clipboard.contents.lock().unwrap() = Some("previous".to_string());
        let sink = sink_with(&clipboard);

        let cases = [
            (PipelineOutcome::EmptyText, "no text detected"),
            (
                PipelineOutcome::CaptureFailed("no capture tool succeeded".into()),
                "capture failed",
            ),
            (
                PipelineOutcome::RecognitionFailed("exit 1".into()),
                "recognition failed",
            ),
            (
                PipelineOutcome::ToolUnavailable("tesseract".into()),
                "tool unavailable: tesseract",
            ),
        ];
        for (outcome, summary) in cases {
            let report = sink.deliver(outcome);
            assert_eq!(report.summary, summary);
            assert!(!report.copied);
        }

        assert_eq!(*clipboard.writes.lock().unwrap(), 0);
        assert_eq!(
            clipboard.contents.lock().unwrap().as_deref(),
            Some("previous")
        );
    }

    #[test]
    fn failure_detail_reaches_notification() {
        let report = sink_with(&MemoryClipboard::default()).deliver(
            PipelineOutcome::CaptureFailed("no capture tool succeeded".into()),
        );
        let notification = report.notification();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(
            notification.body,
            "capture failed: no capture tool succeeded"
        );
    }

    #[test]
    fn clipboard_error_is_reported_once() {
        let clipboard = MemoryClipboard {
            broken: true,
            ..Default::default()
        };
        let report = sink_with(&clipboard).deliver(PipelineOutcome::Success("text".into()));

        assert!(!report.copied);
        assert_eq!(*clipboard.writes.lock().unwrap(), 1);
        assert_eq!(report.detail.as_deref(), Some("clipboard unavailable: no display"));
        assert_eq!(report.notification().level, NotificationLevel::Error);
    }

    #[test]
    fn preview_truncates_by_chars() {
        let long = "a".repeat(150);
        let cut = preview(&long, PREVIEW_CHARS);
        assert_eq!(cut.len(), 103);
        assert!(cut.ends_with("..."));

        assert_eq!(preview(&"a".repeat(100), PREVIEW_CHARS), "a".repeat(100));

        let chinese = "文字".repeat(60);
        let cut = preview(&chinese, PREVIEW_CHARS);
        assert_eq!(cut.chars().count(), 103);
    }
}
