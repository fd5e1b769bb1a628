mod capture;
mod error;
mod hotkey;
mod ocr;
mod process;
mod surface;

pub use capture::{
    CaptureProvider, CaptureStep, CapturedImage, Coverage, GnomeScreenshot, Grim, PixelFormat,
    SlurpGrim, default_chain,
};
pub use error::{CaptureError, RecognitionError, ToolError};
pub use hotkey::{HotkeyManager, parse_binding};
pub use ocr::{OcrBackend, Recognizer, TesseractBackend};
pub use process::{SystemRunner, ToolCommand, ToolOutput, ToolRunner};
pub use surface::{CaptureSurface, NoSurface, SurfaceGuard};
