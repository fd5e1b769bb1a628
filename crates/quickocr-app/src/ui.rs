use kanal::AsyncReceiver;
use quickocr_types::{AppEvent, Notification, NotificationLevel};
use tokio_util::sync::CancellationToken;

/// Console stand-in for desktop notifications
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = app_to_ui_rx.recv() => event?,
        };

        match event {
            AppEvent::Notify(notification) => println!("{}", render(&notification)),
            AppEvent::OcrStatusUpdate { status, capturing } => {
                tracing::debug!("[UI] status: {status} (capturing: {capturing})");
            }
            other => tracing::debug!("[UI] ignoring {other:?}"),
        }
    }

    Ok(())
}

pub fn render(notification: &Notification) -> String {
    let level = match notification.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Warning => "warn",
        NotificationLevel::Error => "error",
    };
    let separator = if notification.body.contains('\n') { "\n" } else { " " };
    format!(
        "[{level}] {}:{separator}{}",
        notification.title, notification.body
    )
}
