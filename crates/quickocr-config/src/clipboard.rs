use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_hold_secs() -> u64 {
    60
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ClipboardConfig {
    /// How long `quickocr ocr` keeps serving the copied text before exiting,
    /// unless a clipboard manager or a paste takes it over sooner
    #[serde(default = "default_hold_secs")]
    pub hold_secs: u64,
}

impl ClipboardConfig {
    pub fn new() -> Self {
        Self {
            hold_secs: env_or("QUICKOCR_CLIPBOARD_HOLD_SECS", default_hold_secs()),
        }
    }
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            hold_secs: default_hold_secs(),
        }
    }
}
