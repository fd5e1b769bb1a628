use std::sync::Arc;

use quickocr_config::Config;
use quickocr_core::{Pipeline, SessionState};
use quickocr_ocr::{CaptureSurface, NoSurface};
use quickocr_types::CaptureRegion;

use crate::status::AppStatus;

/// Everything the long-running surfaces share. One per process.
pub struct AppState {
    pub config: Config,
    pub session: SessionState,
    pub pipeline: Pipeline,
    /// Window hidden while capturing. Tray and hotkey triggers have none.
    pub surface: Arc<dyn CaptureSurface>,
    /// Used for triggers that don't carry their own region
    pub default_region: Option<CaptureRegion>,
    pub status: AppStatus,
}

impl AppState {
    pub fn new(config: Config, pipeline: Pipeline, default_region: Option<CaptureRegion>) -> Self {
        Self {
            session: SessionState::new(config.ocr.language),
            config,
            pipeline,
            surface: Arc::new(NoSurface),
            default_region,
            status: AppStatus::new(),
        }
    }
}
