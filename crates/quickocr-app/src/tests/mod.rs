//! Event flow over the app's channels, with fake tools behind the pipeline

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use image::RgbaImage;
use kanal::AsyncReceiver;
use quickocr_config::Config;
use quickocr_core::Pipeline;
use quickocr_io::{Clipboard, ClipboardError, ClipboardHold, ResultSink};
use quickocr_ocr::{
    CaptureProvider, OcrBackend, RecognitionError, Recognizer, ToolCommand, ToolError, ToolOutput,
    ToolRunner, default_chain,
};
use quickocr_types::{AppEvent, Language, Notification};
use tokio::sync::Notify;
use tokio::time::timeout;

use crate::ocr_context::OcrContext;
use crate::state::AppState;


/// Only `grim` is installed, and it writes a small PNG once its gate (if any) opens
#[derive(Default)]
struct GrimOnly {
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl ToolRunner for GrimOnly {
    async fn run(&self, command: ToolCommand) -> Result<ToolOutput, ToolError> {
        if command.program != "grim" {
            return Err(ToolError::Unavailable(command.program));
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let out = command.args.last().unwrap();
        RgbaImage::new(8, 8)
            .save_with_format(out, image::ImageFormat::Png)
            .unwrap();
        Ok(ToolOutput::default())
    }
}

struct FakeBackend {
    available: bool,
    text: &'static str,
}

#[async_trait]
impl OcrBackend for FakeBackend {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn probe(&self) -> Result<String, RecognitionError> {
        if self.available {
            Ok("tesseract 5.3.4".to_string())
        } else {
            Err(RecognitionError::Unavailable("tesseract".to_string()))
        }
    }

    async fn image_to_string(&self, _png: &[u8], _lang: Language) -> Result<String, RecognitionError> {
        Ok(self.text.to_string())
    }

    async fn available_languages(&self) -> Result<Vec<String>, RecognitionError> {
        Ok(vec!["eng".to_string(), "osd".to_string()])
    }
}

/// In-memory clipboard. A persisting one hands each write to an owner
/// thread that logs when it lets go.
#[derive(Clone, Default)]
struct SharedClipboard {
    contents: Arc<Mutex<Option<String>>>,
    log: Arc<Mutex<Vec<&'static str>>>,
    persisting: bool,
    pending: Arc<Mutex<Option<ClipboardHold>>>,
}

impl SharedClipboard {
    fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap().clone()
    }

    fn log(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }
}

impl Clipboard for SharedClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock().unwrap() = Some(text.to_string());
        self.log.lock().unwrap().push("set");
        if self.persisting {
            let log = self.log.clone();
            *self.pending.lock().unwrap() = Some(ClipboardHold::from_thread(std::thread::spawn(
                move || {
                    std::thread::sleep(Duration::from_millis(20));
                    log.lock().unwrap().push("handed off");
                },
            )));
        }
        Ok(())
    }

    fn take_hold(&mut self) -> Option<ClipboardHold> {
        self.pending.lock().unwrap().take()
    }
}

struct TestApp {
    ctx: OcrContext,
    ui_rx: AsyncReceiver<AppEvent>,
    clipboard: SharedClipboard,
    _temp: tempfile::TempDir,
}

impl TestApp {
    fn new(backend_available: bool, text: &'static str) -> Self {
        Self::build(backend_available, text, SharedClipboard::default(), GrimOnly::default())
    }

    /// Captures block until `gate` is notified
    fn gated(gate: Arc<Notify>, text: &'static str) -> Self {
        let grim = GrimOnly { gate: Some(gate) };
        Self::build(true, text, SharedClipboard::default(), grim)
    }

    /// Clipboard that keeps serving after the write, as the one-shot command uses
    fn persisting(text: &'static str) -> Self {
        let clipboard = SharedClipboard {
            persisting: true,
            ..SharedClipboard::default()
        };
        Self::build(true, text, clipboard, GrimOnly::default())
    }

    fn build(
        backend_available: bool,
        text: &'static str,
        clipboard: SharedClipboard,
        grim: GrimOnly,
    ) -> Self {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::default();

        let pipeline = Pipeline::new(
            CaptureProvider::with_steps(
                Arc::new(grim),
                default_chain(&config.capture),
                temp.path().to_path_buf(),
            ),
            Recognizer::new(Arc::new(FakeBackend {
                available: backend_available,
                text,
            })),
            ResultSink::new(Box::new(clipboard.clone())),
            Duration::ZERO,
        );

        let (ui_tx, ui_rx) = kanal::bounded_async(16);
        let state = Arc::new(AppState::new(config, pipeline, None));

        Self {
            ctx: OcrContext::new(state, ui_tx),
            ui_rx,
            clipboard,
            _temp: temp,
        }
    }

    async fn next_event(&self) -> AppEvent {
        timeout(Duration::from_secs(5), self.ui_rx.recv())
            .await
            .expect("timed out waiting for the UI")
            .expect("UI channel closed")
    }

    /// Next notification sent to the UI, skipping status updates
    async fn next_notification(&self) -> Notification {
        loop {
            match self.next_event().await {
                AppEvent::Notify(notification) => return notification,
                AppEvent::OcrStatusUpdate { .. } => continue,
                other => panic!("unexpected UI event: {other:?}"),
            }
        }
    }
}
