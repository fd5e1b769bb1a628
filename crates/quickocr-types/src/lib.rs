pub mod language;
pub mod outcome;
pub mod types;

pub use language::{InvalidLanguage, Language};
pub use outcome::{PipelineOutcome, RecognitionResult};
pub use types::{AppEvent, CaptureRegion, InvalidRegion, Notification, NotificationLevel};
