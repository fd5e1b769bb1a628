use quickocr_types::NotificationLevel;

use crate::ocr_context::OcrContext;

pub async fn handle_set_language(ctx: &OcrContext, tag: &str) {
    match ctx.state.session.set_language(tag).await {
        Ok(language) => {
            ctx.notify(
                "Language",
                format!("OCR language set to {}", language.label()),
                NotificationLevel::Info,
            )
            .await;

            // Missing packs only surface as a warning; the next run fails with the backend's message
            match ctx.state.pipeline.recognizer().missing_packs(language).await {
                Ok(missing) if !missing.is_empty() => {
                    ctx.notify(
                        "Language",
                        format!("Tesseract language data not installed: {}", missing.join(", ")),
                        NotificationLevel::Warning,
                    )
                    .await;
                }
                Ok(_) => {}
                Err(e) => tracing::debug!("could not list installed languages: {e}"),
            }
        }
        Err(e) => {
            tracing::warn!("{e}");
            ctx.notify("Language", e.to_string(), NotificationLevel::Error)
                .await;
        }
    }
}
