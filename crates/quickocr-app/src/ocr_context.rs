use std::sync::Arc;

use kanal::AsyncSender;
use quickocr_types::{AppEvent, Notification, NotificationLevel};

use crate::state::AppState;

/// Shared state plus the channel back to the user-facing surface
#[derive(Clone)]
pub struct OcrContext {
    pub state: Arc<AppState>,
    pub event_tx: AsyncSender<AppEvent>,
}

impl OcrContext {
    pub fn new(state: Arc<AppState>, event_tx: AsyncSender<AppEvent>) -> Self {
        Self { state, event_tx }
    }

    /// Send to the UI. A closed UI channel only means nobody is listening any more.
    pub async fn send(&self, event: AppEvent) {
        if let Err(e) = self.event_tx.send(event).await {
            tracing::debug!("UI channel closed, dropping event: {e}");
        }
    }

    pub async fn notify(&self, title: &str, body: impl Into<String>, level: NotificationLevel) {
        self.send(AppEvent::Notify(Notification {
            title: title.to_string(),
            body: body.into(),
            level,
        }))
        .await;
    }
}
