use quickocr_types::{InvalidLanguage, Language};
use tokio::sync::RwLock;

/// Language selection shared by the long-running surfaces.
/// The one-shot CLI path never creates one.
#[derive(Default)]
pub struct SessionState {
    language: RwLock<Language>,
}

impl SessionState {
    pub fn new(language: Language) -> Self {
        Self {
            language: RwLock::new(language),
        }
    }

    pub async fn language(&self) -> Language {
        *self.language.read().await
    }

    /// Switch to `tag`. Unknown tags are rejected and the current language is kept.
    pub async fn set_language(&self, tag: &str) -> Result<Language, InvalidLanguage> {
        let language: Language = tag.trim().parse()?;
        self.select(language).await;
        Ok(language)
    }

    pub async fn select(&self, language: Language) {
        let mut current = self.language.write().await;
        if *current != language {
            tracing::info!("OCR language set to: {language}");
        }
        *current = language;
    }
}
