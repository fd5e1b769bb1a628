use std::thread::JoinHandle;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

impl From<arboard::Error> for ClipboardError {
    fn from(e: arboard::Error) -> Self {
        ClipboardError(e.to_string())
    }
}

/// Write-only view of the system clipboard
pub trait Clipboard: Send {
    /// Replace the clipboard contents with `text`
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// The thread still serving the last write, if this clipboard keeps one.
    /// A process that exits right after copying must wait on it first.
    fn take_hold(&mut self) -> Option<ClipboardHold> {
        None
    }
}

/// Owner of a copied selection, finished once another client takes it over
/// or the hold time runs out
pub struct ClipboardHold(JoinHandle<()>);

impl ClipboardHold {
    pub fn from_thread(handle: JoinHandle<()>) -> Self {
        Self(handle)
    }

    /// Block until the selection has been handed off
    pub fn wait(self) {
        if self.0.join().is_err() {
            tracing::error!("clipboard owner thread panicked");
        }
    }
}

/// arboard-backed clipboard, connected on first use
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
    hold: Option<Duration>,
    pending: Option<ClipboardHold>,
}

impl SystemClipboard {
    /// For long-running processes: the selection lives as long as `self`
    pub fn new() -> Self {
        Self::default()
    }

    /// For processes about to exit. X11 and Wayland selections are served by
    /// their owner, so after each write a thread keeps serving the text until
    /// a clipboard manager or a paste takes it over, or `hold` elapses.
    pub fn persisting(hold: Duration) -> Self {
        Self {
            hold: Some(hold),
            ..Self::default()
        }
    }

    /// How long a write is served after the process is done with it
    pub fn hold(&self) -> Option<Duration> {
        self.hold
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        clipboard.set_text(text)?;

        #[cfg(target_os = "linux")]
        if let Some(hold) = self.hold {
            self.pending = Some(serve_until_taken(clipboard, text.to_string(), hold));
            return Ok(());
        }

        self.inner = Some(clipboard);
        Ok(())
    }

    fn take_hold(&mut self) -> Option<ClipboardHold> {
        self.pending.take()
    }
}

#[cfg(target_os = "linux")]
fn serve_until_taken(mut clipboard: arboard::Clipboard, text: String, hold: Duration) -> ClipboardHold {
    use arboard::SetExtLinux;

    let deadline = std::time::Instant::now() + hold;
    ClipboardHold::from_thread(std::thread::spawn(move || {
        match clipboard.set().wait_until(deadline).text(text) {
            Ok(()) => tracing::debug!("clipboard selection handed off"),
            Err(e) => tracing::warn!("clipboard owner stopped early: {e}"),
        }
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn plain_clipboard_keeps_no_hold() {
        let mut clipboard = SystemClipboard::new();
        assert_eq!(clipboard.hold(), None);
        assert!(clipboard.take_hold().is_none());
    }

    #[test]
    fn persisting_clipboard_has_nothing_to_wait_for_before_a_write() {
        let mut clipboard = SystemClipboard::persisting(Duration::from_secs(5));
        assert_eq!(clipboard.hold(), Some(Duration::from_secs(5)));
        assert!(clipboard.take_hold().is_none());
    }

    #[test]
    fn waiting_on_a_hold_joins_the_owner() {
        let served = Arc::new(Mutex::new(false));
        let flag = served.clone();
        let hold = ClipboardHold::from_thread(std::thread::spawn(move || {
            *flag.lock().unwrap() = true;
        }));

        hold.wait();
        assert!(*served.lock().unwrap());
    }
}
