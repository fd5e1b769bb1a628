pub mod clipboard;
pub mod sink;

pub use clipboard::{Clipboard, ClipboardError, ClipboardHold, SystemClipboard};
pub use sink::{DeliveryReport, PREVIEW_CHARS, ResultSink, preview};
