use quickocr_types::Language;
use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_language() -> Language {
    Language::English
}

fn default_tesseract_cmd() -> String {
    "tesseract".to_string()
}

/// LSTM + legacy, whichever is available
fn default_oem() -> u8 {
    3
}

/// Assume a single uniform block of text
fn default_psm() -> u8 {
    6
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OcrConfig {
    #[serde(default = "default_language")]
    pub language: Language,
    #[serde(default = "default_tesseract_cmd")]
    pub tesseract_cmd: String,
    #[serde(default = "default_oem")]
    pub oem: u8,
    #[serde(default = "default_psm")]
    pub psm: u8,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl OcrConfig {
    pub fn new() -> Self {
        Self {
            language: env_or("QUICKOCR_LANGUAGE", default_language()),
            tesseract_cmd: env_or("QUICKOCR_TESSERACT_CMD", default_tesseract_cmd()),
            oem: env_or("QUICKOCR_OEM", default_oem()),
            psm: env_or("QUICKOCR_PSM", default_psm()),
            timeout_secs: env_or("QUICKOCR_OCR_TIMEOUT_SECS", default_timeout_secs()),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            tesseract_cmd: default_tesseract_cmd(),
            oem: default_oem(),
            psm: default_psm(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
