use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quickocr_config::ocr::OcrConfig;
use quickocr_types::{Language, RecognitionResult};
use tokio::sync::OnceCell;

use crate::capture::CapturedImage;
use crate::error::{RecognitionError, ToolError};
use crate::process::{ToolCommand, ToolRunner};

/// External OCR engine
#[async_trait]
pub trait OcrBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Check the backend can run at all, returning its version
    async fn probe(&self) -> Result<String, RecognitionError>;

    /// Raw text for a PNG-encoded image
    async fn image_to_string(&self, png: &[u8], lang: Language) -> Result<String, RecognitionError>;

    /// Installed language packs
    async fn available_languages(&self) -> Result<Vec<String>, RecognitionError>;
}

pub struct TesseractBackend {
    runner: Arc<dyn ToolRunner>,
    program: String,
    oem: u8,
    psm: u8,
    timeout: Duration,
}

impl TesseractBackend {
    pub fn new(runner: Arc<dyn ToolRunner>, config: &OcrConfig) -> Self {
        Self {
            runner,
            program: config.tesseract_cmd.clone(),
            oem: config.oem,
            psm: config.psm,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn command(&self) -> ToolCommand {
        ToolCommand::new(self.program.clone(), self.timeout)
    }
}

fn backend_error(e: ToolError) -> RecognitionError {
    match e {
        ToolError::Unavailable(name) => RecognitionError::Unavailable(name),
        other => RecognitionError::Backend(other.to_string()),
    }
}

#[async_trait]
impl OcrBackend for TesseractBackend {
    fn name(&self) -> &str {
        &self.program
    }

    async fn probe(&self) -> Result<String, RecognitionError> {
        let output = self
            .runner
            .run(self.command().arg("--version"))
            .await
            .map_err(backend_error)?;

        // Older releases print the banner on stderr
        let banner = if output.stdout.is_empty() {
            String::from_utf8_lossy(&output.stderr).into_owned()
        } else {
            output.stdout_text()
        };
        Ok(banner.lines().next().unwrap_or_default().trim().to_string())
    }

    async fn image_to_string(&self, png: &[u8], lang: Language) -> Result<String, RecognitionError> {
        let command = self
            .command()
            .arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(lang.tag())
            .arg("--oem")
            .arg(self.oem.to_string())
            .arg("--psm")
            .arg(self.psm.to_string())
            .stdin(png.to_vec());

        let output = self.runner.run(command).await.map_err(backend_error)?;
        Ok(output.stdout_text())
    }

    async fn available_languages(&self) -> Result<Vec<String>, RecognitionError> {
        let output = self
            .runner
            .run(self.command().arg("--list-langs"))
            .await
            .map_err(backend_error)?;

        // First line is a header: List of available languages in "..." (N):
        Ok(output
            .stdout_text()
            .lines()
            .skip(1)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Recognition engine with a once-per-lifetime availability probe
pub struct Recognizer {
    backend: Arc<dyn OcrBackend>,
    probe: OnceCell<Result<String, RecognitionError>>,
}

impl Recognizer {
    pub fn new(backend: Arc<dyn OcrBackend>) -> Self {
        Self {
            backend,
            probe: OnceCell::new(),
        }
    }

    pub fn tesseract(runner: Arc<dyn ToolRunner>, config: &OcrConfig) -> Self {
        Self::new(Arc::new(TesseractBackend::new(runner, config)))
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Probe the backend on first call, then replay the cached answer.
    /// Any probe failure means the backend is unavailable.
    pub async fn probe(&self) -> Result<&str, RecognitionError> {
        let result = self
            .probe
            .get_or_init(|| async {
                match self.backend.probe().await {
                    Ok(version) => {
                        tracing::info!("OCR backend ready: {version}");
                        Ok(version)
                    }
                    Err(e) => {
                        tracing::error!("OCR backend probe failed: {e}");
                        Err(RecognitionError::Unavailable(self.backend.name().to_string()))
                    }
                }
            })
            .await;

        match result {
            Ok(version) => Ok(version.as_str()),
            Err(e) => Err(e.clone()),
        }
    }

    /// Language packs a selector needs that the backend doesn't have
    pub async fn missing_packs(&self, lang: Language) -> Result<Vec<&'static str>, RecognitionError> {
        let installed = self.backend.available_languages().await?;
        Ok(lang
            .packs()
            .filter(|pack| !installed.iter().any(|have| have == pack))
            .collect())
    }

    pub async fn recognize(
        &self,
        image: &CapturedImage,
        lang: Language,
    ) -> Result<RecognitionResult, RecognitionError> {
        self.probe().await?;

        let png = image
            .encode_png()
            .map_err(|e| RecognitionError::Encode(e.to_string()))?;

        tracing::debug!(
            "recognizing {}x{} image ({} bytes png) as {lang}",
            image.width,
            image.height,
            png.len()
        );
        let raw = self.backend.image_to_string(&png, lang).await?;
        let result = RecognitionResult::from_raw(&raw);
        tracing::debug!("recognized {} chars", result.text.chars().count());

        Ok(result)
    }
}
