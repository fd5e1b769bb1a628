use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use quickocr_config::Config;
use quickocr_io::{Clipboard, ClipboardHold, DeliveryReport, ResultSink, SystemClipboard};
use quickocr_ocr::{
    CaptureProvider, CaptureSurface, RecognitionError, Recognizer, SurfaceGuard, SystemRunner,
    ToolRunner,
};
use quickocr_types::{CaptureRegion, Language, PipelineOutcome};

#[derive(Debug, thiserror::Error)]
#[error("a capture is already in progress")]
pub struct PipelineBusy;

/// Clears the in-flight flag when the run ends, however it ends
struct FlightGuard<'a>(&'a AtomicBool);

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| FlightGuard(flag))
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Capture, recognize, deliver. One run at a time.
pub struct Pipeline {
    capture: CaptureProvider,
    recognizer: Recognizer,
    sink: ResultSink,
    settle_delay: Duration,
    running: AtomicBool,
}

impl Pipeline {
    pub fn new(
        capture: CaptureProvider,
        recognizer: Recognizer,
        sink: ResultSink,
        settle_delay: Duration,
    ) -> Self {
        Self {
            capture,
            recognizer,
            sink,
            settle_delay,
            running: AtomicBool::new(false),
        }
    }

    /// Real tools, real clipboard
    pub fn from_config(config: &Config) -> Self {
        Self::with_clipboard(config, Box::new(SystemClipboard::new()))
    }

    /// Real tools, delivering into `clipboard`
    pub fn with_clipboard(config: &Config, clipboard: Box<dyn Clipboard>) -> Self {
        let runner: Arc<dyn ToolRunner> = Arc::new(SystemRunner);
        Self::new(
            CaptureProvider::new(runner.clone(), &config.capture),
            Recognizer::tesseract(runner, &config.ocr),
            ResultSink::new(clipboard),
            Duration::from_millis(config.capture.settle_delay_ms),
        )
    }

    pub fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }

    /// See [`ResultSink::take_hold`]
    pub fn take_clipboard_hold(&self) -> Option<ClipboardHold> {
        self.sink.take_hold()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run one capture-and-recognize cycle and deliver the result.
    ///
    /// `surface` is hidden before capturing and shown again after delivery.
    /// A second call while one is in flight is rejected with [`PipelineBusy`].
    pub async fn run(
        &self,
        region: Option<CaptureRegion>,
        language: Language,
        surface: &dyn CaptureSurface,
    ) -> Result<DeliveryReport, PipelineBusy> {
        let _flight = FlightGuard::acquire(&self.running).ok_or(PipelineBusy)?;

        // Fail fast, before anything is hidden or captured
        if self.recognizer.probe().await.is_err() {
            let name = self.recognizer.backend_name().to_string();
            return Ok(self.sink.deliver(PipelineOutcome::ToolUnavailable(name)));
        }

        let guard = SurfaceGuard::acquire(surface);
        if guard.hid_surface() && !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        let outcome = self.capture_and_recognize(region, language).await;
        let report = self.sink.deliver(outcome);
        drop(guard);

        Ok(report)
    }

    async fn capture_and_recognize(
        &self,
        region: Option<CaptureRegion>,
        language: Language,
    ) -> PipelineOutcome {
        let image = match self.capture.capture(region).await {
            Ok(image) => image,
            Err(e) => {
                tracing::error!("capture failed: {e}");
                return PipelineOutcome::CaptureFailed(e.to_string());
            }
        };

        match self.recognizer.recognize(&image, language).await {
            Ok(result) => result.into(),
            Err(RecognitionError::Unavailable(name)) => PipelineOutcome::ToolUnavailable(name),
            Err(e) => {
                tracing::error!("recognition failed: {e}");
                PipelineOutcome::RecognitionFailed(e.to_string())
            }
        }
    }
}
