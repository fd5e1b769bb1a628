//! Manual capture + OCR check - run with: cargo run -p quickocr-ocr --bin test_ocr [lang]

use std::sync::Arc;

use anyhow::Result;
use quickocr_config::Config;
use quickocr_ocr::{CaptureProvider, Recognizer, SystemRunner, ToolRunner};
use quickocr_types::Language;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("debug").init();

    let lang: Language = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<Language>())
        .transpose()?
        .unwrap_or_default();
    let config = Config::new();
    let runner: Arc<dyn ToolRunner> = Arc::new(SystemRunner);

    // 1. Backend
    let recognizer = Recognizer::tesseract(runner.clone(), &config.ocr);
    let version = recognizer.probe().await?;
    tracing::info!("backend: {version}");
    let missing = recognizer.missing_packs(lang).await?;
    if !missing.is_empty() {
        tracing::warn!("missing language packs: {}", missing.join(", "));
    }

    // 2. Capture
    let provider = CaptureProvider::new(runner, &config.capture);
    tracing::info!("chain: {}", provider.step_names().join(" -> "));
    let start = std::time::Instant::now();
    let image = provider.capture(None).await?;
    tracing::info!("{}x{} in {:?}", image.width, image.height, start.elapsed());

    // 3. OCR
    let start = std::time::Instant::now();
    let result = recognizer.recognize(&image, lang).await?;
    tracing::info!("{:?} - {} chars", start.elapsed(), result.text.chars().count());
    for line in result.text.lines().take(5) {
        tracing::info!("   > {}", line);
    }

    Ok(())
}
