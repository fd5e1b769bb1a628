use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use quickocr_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::watcher_io;
use crate::ocr_context::OcrContext;
use crate::state::AppState;
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(64), // notifications and status
            ui_to_app: kanal::bounded_async(16), // hotkey and console commands
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            OcrContext::new(self.state.clone(), self.channels.app_to_ui.0.clone()),
            self.channels.ui_to_app.1.clone(),
            self.cancel_token.clone(),
        ));

        // Notification loop
        tasks.spawn(ui_loop(
            self.channels.app_to_ui.1.clone(),
            self.cancel_token.child_token(),
        ));

        // Watcher IO
        let poll_interval = Duration::from_millis(self.state.config.hotkey.poll_interval_ms);
        tasks.spawn(watcher_io(
            self.state.clone(),
            poll_interval,
            self.cancel_token.child_token(),
            self.channels.ui_to_app.0.clone(),
        ));

        tasks
    }

    /// Resolves once any task (e.g. the event loop after `quit`) has cancelled the token
    pub async fn cancelled(&self) {
        self.cancel_token.cancelled().await
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
