use std::process::ExitCode;
use std::time::Duration;

use quickocr_config::Config;
use quickocr_config::clipboard::ClipboardConfig;
use quickocr_core::{Pipeline, PipelineBusy};
use quickocr_io::{DeliveryReport, SystemClipboard};
use quickocr_ocr::{NoSurface, Recognizer};
use quickocr_types::{CaptureRegion, Language, PipelineOutcome};

pub const INSTALL_HINT: &str = "Please install tesseract-ocr:\n\
    sudo dnf install tesseract tesseract-langpack-eng tesseract-langpack-chi-sim\n\
    sudo apt install tesseract-ocr tesseract-ocr-eng tesseract-ocr-chi-sim";

/// `quickocr ocr`: one capture, one result, then exit
pub async fn run_direct_ocr(
    config: &Config,
    language: Language,
    region: Option<CaptureRegion>,
) -> ExitCode {
    let pipeline = Pipeline::with_clipboard(config, Box::new(one_shot_clipboard(&config.clipboard)));

    if !ensure_backend(pipeline.recognizer()).await {
        return ExitCode::FAILURE;
    }
    warn_missing_packs(pipeline.recognizer(), language).await;

    tracing::info!("Capturing ({})", language.label());
    match deliver_once(&pipeline, language, region).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(busy) => {
            tracing::error!("{busy}");
            ExitCode::FAILURE
        }
    }
}

/// The process exits right after copying, so the clipboard must outlive it
pub fn one_shot_clipboard(config: &ClipboardConfig) -> SystemClipboard {
    SystemClipboard::persisting(Duration::from_secs(config.hold_secs))
}

/// Run the pipeline, print the result, and keep the copied text alive
/// until the clipboard has been handed off
pub async fn deliver_once(
    pipeline: &Pipeline,
    language: Language,
    region: Option<CaptureRegion>,
) -> Result<DeliveryReport, PipelineBusy> {
    let report = pipeline.run(region, language, &NoSurface).await?;
    println!("{}", direct_message(&report));

    if let Some(hold) = pipeline.take_clipboard_hold() {
        tracing::info!("Keeping the clipboard until it is pasted or taken over");
        if let Err(e) = tokio::task::spawn_blocking(move || hold.wait()).await {
            tracing::error!("clipboard hand-off failed: {e}");
        }
    }

    Ok(report)
}

/// Probe the backend, printing install instructions when it is missing
pub async fn ensure_backend(recognizer: &Recognizer) -> bool {
    match recognizer.probe().await {
        Ok(version) => {
            tracing::debug!("using {version}");
            true
        }
        Err(e) => {
            eprintln!("Tesseract not found: {e}");
            eprintln!("{INSTALL_HINT}");
            false
        }
    }
}

pub async fn warn_missing_packs(recognizer: &Recognizer, language: Language) {
    match recognizer.missing_packs(language).await {
        Ok(missing) if !missing.is_empty() => tracing::warn!(
            "Tesseract language data not installed for {}: {}",
            language.label(),
            missing.join(", ")
        ),
        Ok(_) => {}
        Err(e) => tracing::debug!("could not list installed languages: {e}"),
    }
}

pub fn direct_message(report: &DeliveryReport) -> String {
    match &report.outcome {
        PipelineOutcome::Success(text) if report.copied => {
            format!("OCR Result copied to clipboard:\n{text}")
        }
        PipelineOutcome::EmptyText => "No text detected in the captured area".to_string(),
        _ => report.notification().body,
    }
}
