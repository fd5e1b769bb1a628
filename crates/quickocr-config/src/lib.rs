use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::clipboard::ClipboardConfig;
use self::hotkey::HotkeyConfig;
use self::ocr::OcrConfig;

pub mod capture;
pub mod clipboard;
pub mod hotkey;
pub mod ocr;

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub ocr: OcrConfig,
    pub capture: CaptureConfig,
    pub hotkey: HotkeyConfig,
    pub clipboard: ClipboardConfig,
}

impl Config {
    pub fn new() -> Self {
        Config {
            ocr: OcrConfig::new(),
            capture: CaptureConfig::new(),
            hotkey: HotkeyConfig::new(),
            clipboard: ClipboardConfig::new(),
        }
    }
}

/// Read and parse an environment variable, keeping `default` when unset or unparsable
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("ignoring invalid value '{raw}' for {key}");
                default
            }
        },
        Err(_) => default,
    }
}
