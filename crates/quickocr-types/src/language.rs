use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// OCR language selector. Only these tags are ever handed to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "eng")]
    English,
    #[serde(rename = "chi_sim")]
    ChineseSimplified,
    #[serde(rename = "eng+chi_sim")]
    EnglishChinese,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid language '{0}', expected one of: eng, chi_sim, eng+chi_sim")]
pub struct InvalidLanguage(pub String);

impl Language {
    pub const ALL: [Language; 3] = [
        Language::English,
        Language::ChineseSimplified,
        Language::EnglishChinese,
    ];

    /// Tag understood by tesseract's `-l` flag
    pub fn tag(&self) -> &'static str {
        match self {
            Language::English => "eng",
            Language::ChineseSimplified => "chi_sim",
            Language::EnglishChinese => "eng+chi_sim",
        }
    }

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::ChineseSimplified => "Chinese",
            Language::EnglishChinese => "English + Chinese",
        }
    }

    /// Individual language packs the backend needs for this selector
    pub fn packs(&self) -> impl Iterator<Item = &'static str> {
        self.tag().split('+')
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = InvalidLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.tag() == s)
            .ok_or_else(|| InvalidLanguage(s.to_string()))
    }
}
