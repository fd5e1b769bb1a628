use quickocr_types::{AppEvent, CaptureRegion};

use crate::ocr_context::OcrContext;

/// Start a capture in the background so the event loop keeps serving commands
pub async fn handle_ocr_trigger(ctx: &OcrContext, region: Option<CaptureRegion>) {
    let ctx = ctx.clone();
    tokio::spawn(async move { run_ocr(ctx, region).await });
}

/// Triggers that arrive while a run is in flight are dropped without touching
/// the status, which stays with the run in flight until it reports "Ready"
pub(crate) async fn run_ocr(ctx: OcrContext, region: Option<CaptureRegion>) {
    if ctx.state.pipeline.is_running() {
        tracing::warn!(">>> [OCR] Trigger ignored, a capture is already in progress");
        return;
    }

    let language = ctx.state.session.language().await;
    tracing::debug!(">>> [OCR] Triggered ({language}, region {region:?})");

    let status = |status: &str, capturing: bool| AppEvent::OcrStatusUpdate {
        status: status.to_string(),
        capturing,
    };

    ctx.send(status("Capturing", true)).await;

    let result = ctx
        .state
        .pipeline
        .run(region, language, ctx.state.surface.as_ref())
        .await;
    let report = match result {
        Ok(report) => report,
        Err(busy) => {
            // Lost the race to a run that started after the check above. That run
            // was already in flight when our "Capturing" went out, so its "Ready" follows it.
            tracing::warn!(">>> [OCR] {busy}");
            return;
        }
    };

    tracing::info!(">>> [OCR] {}", report.outcome.category());
    ctx.state.status.record(&report).await;
    ctx.send(AppEvent::Notify(report.notification())).await;
    ctx.send(status("Ready", false)).await;
}
