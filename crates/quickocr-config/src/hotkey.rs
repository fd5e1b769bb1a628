use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_enabled() -> bool {
    true
}

fn default_binding() -> String {
    "ctrl+shift+o".to_string()
}

fn default_poll_interval_ms() -> u64 {
    50
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HotkeyConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Accelerator string, e.g. `ctrl+shift+o` or `f9`
    #[serde(default = "default_binding")]
    pub binding: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl HotkeyConfig {
    pub fn new() -> Self {
        Self {
            enabled: env_or("QUICKOCR_HOTKEY_ENABLED", default_enabled()),
            binding: env_or("QUICKOCR_HOTKEY", default_binding()),
            poll_interval_ms: env_or("QUICKOCR_DELTA_TIME_MS", default_poll_interval_ms()),
        }
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            binding: default_binding(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}
