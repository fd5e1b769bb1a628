use std::ops::ControlFlow;

use kanal::AsyncReceiver;
use quickocr_types::{AppEvent, Language, NotificationLevel};
use tokio_util::sync::CancellationToken;

use crate::ocr_context::OcrContext;

pub mod set_language;
pub mod trigger_ocr;

use set_language::handle_set_language;
use trigger_ocr::handle_ocr_trigger;

/// App's main loop
pub async fn event_loop(
    ctx: OcrContext,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::debug!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => event?,
        };

        tracing::debug!("[EVENT_LOOP] event received: {event:?}");
        if handle_events(&ctx, event).await.is_break() {
            tracing::info!("Quit requested");
            cancel.cancel();
            break;
        }
    }

    Ok(())
}

pub(crate) async fn handle_events(ctx: &OcrContext, event: AppEvent) -> ControlFlow<()> {
    match event {
        AppEvent::TriggerOcr(region) => {
            let region = region.or(ctx.state.default_region);
            handle_ocr_trigger(ctx, region).await;
        }
        AppEvent::SetLanguage(tag) => {
            handle_set_language(ctx, &tag).await;
        }
        AppEvent::ListLanguages => {
            let current = ctx.state.session.language().await;
            ctx.notify("Languages", language_menu(current), NotificationLevel::Info)
                .await;
        }
        AppEvent::ShowStatus => {
            let ocr = ctx.state.status.snapshot().await;
            let language = ctx.state.session.language().await;
            let body = format!(
                "{}, language {}{}",
                ocr.summary(),
                language.label(),
                if ctx.state.pipeline.is_running() { ", capture in progress" } else { "" }
            );
            ctx.notify("Status", body, NotificationLevel::Info).await;
        }
        AppEvent::Quit => return ControlFlow::Break(()),
        // Status and notifications only travel towards the UI
        other => tracing::debug!("[EVENT_LOOP] ignoring {other:?}"),
    }

    ControlFlow::Continue(())
}

/// One line per selectable language, the active one marked
pub(crate) fn language_menu(current: Language) -> String {
    Language::ALL
        .iter()
        .map(|lang| {
            let marker = if *lang == current { '*' } else { ' ' };
            format!("{marker} {:<12} {}", lang.tag(), lang.label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
