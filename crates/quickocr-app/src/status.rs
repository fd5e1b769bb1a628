use std::sync::Arc;

use quickocr_io::DeliveryReport;
use quickocr_types::PipelineOutcome;
use tokio::sync::RwLock;

/// OCR status information
#[derive(Clone, Debug, Default)]
pub struct OcrStatus {
    pub capture_count: u64,
    pub empty_count: u64,
    pub error_count: u64,
    pub current_message: String,
}

impl OcrStatus {
    pub fn summary(&self) -> String {
        format!(
            "{} captures, {} empty, {} failed{}",
            self.capture_count,
            self.empty_count,
            self.error_count,
            if self.current_message.is_empty() {
                String::new()
            } else {
                format!(" (last: {})", self.current_message)
            }
        )
    }
}

/// Application status
pub struct AppStatus {
    pub ocr: Arc<RwLock<OcrStatus>>,
}

impl AppStatus {
    pub fn new() -> Self {
        Self {
            ocr: Arc::new(RwLock::new(OcrStatus::default())),
        }
    }

    pub async fn record(&self, report: &DeliveryReport) {
        let mut ocr = self.ocr.write().await;
        ocr.capture_count += 1;
        match report.outcome {
            PipelineOutcome::Success(_) if report.copied => {}
            PipelineOutcome::EmptyText => ocr.empty_count += 1,
            _ => ocr.error_count += 1,
        }
        ocr.current_message = match &report.outcome {
            // "clipboard write failed"
            PipelineOutcome::Success(_) if !report.copied => report.summary.clone(),
            outcome => outcome.category(),
        };
    }

    pub async fn snapshot(&self) -> OcrStatus {
        self.ocr.read().await.clone()
    }
}

impl Default for AppStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcome: PipelineOutcome, copied: bool) -> DeliveryReport {
        DeliveryReport {
            summary: outcome.category(),
            outcome,
            detail: None,
            copied,
        }
    }

    #[tokio::test]
    async fn counts_outcomes() {
        let status = AppStatus::new();
        status
            .record(&report(PipelineOutcome::Success("hi".into()), true))
            .await;
        status.record(&report(PipelineOutcome::EmptyText, false)).await;
        status
            .record(&report(PipelineOutcome::CaptureFailed("x".into()), false))
            .await;

        let snapshot = status.snapshot().await;
        assert_eq!(snapshot.capture_count, 3);
        assert_eq!(snapshot.empty_count, 1);
        assert_eq!(snapshot.error_count, 1);
        assert_eq!(
            snapshot.summary(),
            "3 captures, 1 empty, 1 failed (last: capture failed)"
        );
    }
}
