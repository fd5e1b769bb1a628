use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_select_timeout_secs() -> u64 {
    30
}

fn default_capture_timeout_secs() -> u64 {
    10
}

fn default_settle_delay_ms() -> u64 {
    300
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CaptureConfig {
    /// Bound for tools that wait on the user (area selection)
    #[serde(default = "default_select_timeout_secs")]
    pub select_timeout_secs: u64,
    /// Bound for non-interactive screen grabs
    #[serde(default = "default_capture_timeout_secs")]
    pub capture_timeout_secs: u64,
    /// Wait after hiding the invoking window before capturing.
    /// There is no portable "window is gone" signal, so this is an approximation.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Directory for ephemeral capture files, system temp dir when unset
    pub temp_dir: Option<PathBuf>,
}

impl CaptureConfig {
    pub fn new() -> Self {
        Self {
            select_timeout_secs: env_or(
                "QUICKOCR_SELECT_TIMEOUT_SECS",
                default_select_timeout_secs(),
            ),
            capture_timeout_secs: env_or(
                "QUICKOCR_CAPTURE_TIMEOUT_SECS",
                default_capture_timeout_secs(),
            ),
            settle_delay_ms: env_or("QUICKOCR_SETTLE_DELAY_MS", default_settle_delay_ms()),
            temp_dir: env::var_os("QUICKOCR_TEMP_DIR").map(PathBuf::from),
        }
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(env::temp_dir)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            select_timeout_secs: default_select_timeout_secs(),
            capture_timeout_secs: default_capture_timeout_secs(),
            settle_delay_ms: default_settle_delay_ms(),
            temp_dir: None,
        }
    }
}
