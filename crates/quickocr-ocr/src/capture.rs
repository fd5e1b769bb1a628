use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::{DynamicImage, ImageEncoder, ImageReader};
use quickocr_config::capture::CaptureConfig;
use quickocr_types::CaptureRegion;

use crate::error::{CaptureError, ToolError};
use crate::process::{ToolCommand, ToolRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba8,
}

/// Decoded screenshot, held only in memory
#[derive(Clone)]
pub struct CapturedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl CapturedImage {
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let rgba = image.into_rgba8();
        Self {
            width: rgba.width(),
            height: rgba.height(),
            data: rgba.into_raw(),
            format: PixelFormat::Rgba8,
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut buffer = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buffer).write_image(
            &self.data,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(buffer)
    }
}

/// What a capture step wrote to its output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Exactly the requested region, or the user's selection
    Exact,
    /// The whole screen; crop it when a region was requested
    FullScreen,
}

/// One entry of the capture chain
#[async_trait]
pub trait CaptureStep: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this step adds anything for `region`
    fn handles(&self, _region: Option<CaptureRegion>) -> bool {
        true
    }

    /// Write a PNG of `region` (or of an interactive selection when `None`) to `output`
    async fn capture(
        &self,
        runner: &dyn ToolRunner,
        region: Option<CaptureRegion>,
        output: &Path,
    ) -> Result<Coverage, ToolError>;
}

/// `gnome-screenshot`: interactive area selection, or a full-screen grab cropped afterwards
pub struct GnomeScreenshot {
    pub timeout: Duration,
}

#[async_trait]
impl CaptureStep for GnomeScreenshot {
    fn name(&self) -> &'static str {
        "gnome-screenshot"
    }

    async fn capture(
        &self,
        runner: &dyn ToolRunner,
        region: Option<CaptureRegion>,
        output: &Path,
    ) -> Result<Coverage, ToolError> {
        let mut command = ToolCommand::new(self.name(), self.timeout);
        if region.is_none() {
            command = command.arg("--area");
        }
        runner.run(command.arg("--file").arg(output)).await?;

        Ok(match region {
            Some(_) => Coverage::FullScreen,
            None => Coverage::Exact,
        })
    }
}

/// `slurp` picks the geometry, `grim` captures it
pub struct SlurpGrim {
    pub select_timeout: Duration,
    pub capture_timeout: Duration,
}

impl SlurpGrim {
    async fn select(&self, runner: &dyn ToolRunner) -> Result<CaptureRegion, ToolError> {
        let output = runner
            .run(ToolCommand::new("slurp", self.select_timeout))
            .await?;
        let text = output.stdout_text();
        if text.trim().is_empty() {
            return Err(ToolError::Output {
                tool: "slurp".to_string(),
                reason: "no geometry returned".to_string(),
            });
        }
        text.parse().map_err(|e| ToolError::Output {
            tool: "slurp".to_string(),
            reason: format!("{e}"),
        })
    }
}

#[async_trait]
impl CaptureStep for SlurpGrim {
    fn name(&self) -> &'static str {
        "slurp+grim"
    }

    /// Only interactive selections: with a known region this is plain `grim -g`,
    /// which the tertiary step already runs
    fn handles(&self, region: Option<CaptureRegion>) -> bool {
        region.is_none()
    }

    async fn capture(
        &self,
        runner: &dyn ToolRunner,
        region: Option<CaptureRegion>,
        output: &Path,
    ) -> Result<Coverage, ToolError> {
        let region = match region {
            Some(region) => region,
            None => self.select(runner).await?,
        };
        tracing::debug!("capturing selection {region} with grim");

        runner
            .run(
                ToolCommand::new("grim", self.capture_timeout)
                    .arg("-g")
                    .arg(region.geometry())
                    .arg(output),
            )
            .await?;
        Ok(Coverage::Exact)
    }
}

/// Plain `grim`: the given geometry, or the whole screen
pub struct Grim {
    pub timeout: Duration,
}

#[async_trait]
impl CaptureStep for Grim {
    fn name(&self) -> &'static str {
        "grim"
    }

    async fn capture(
        &self,
        runner: &dyn ToolRunner,
        region: Option<CaptureRegion>,
        output: &Path,
    ) -> Result<Coverage, ToolError> {
        let mut command = ToolCommand::new(self.name(), self.timeout);
        if let Some(region) = region {
            command = command.arg("-g").arg(region.geometry());
        }
        runner.run(command.arg(output)).await?;
        Ok(Coverage::Exact)
    }
}

/// The default chain in priority order
pub fn default_chain(config: &CaptureConfig) -> Vec<Box<dyn CaptureStep>> {
    let select_timeout = Duration::from_secs(config.select_timeout_secs);
    let capture_timeout = Duration::from_secs(config.capture_timeout_secs);

    vec![
        Box::new(GnomeScreenshot {
            timeout: select_timeout,
        }),
        Box::new(SlurpGrim {
            select_timeout,
            capture_timeout,
        }),
        Box::new(Grim {
            timeout: capture_timeout,
        }),
    ]
}

/// Acquires a screenshot from the first capture step that works
pub struct CaptureProvider {
    runner: Arc<dyn ToolRunner>,
    steps: Vec<Box<dyn CaptureStep>>,
    temp_dir: PathBuf,
}

impl CaptureProvider {
    pub fn new(runner: Arc<dyn ToolRunner>, config: &CaptureConfig) -> Self {
        Self::with_steps(runner, default_chain(config), config.temp_dir())
    }

    pub fn with_steps(
        runner: Arc<dyn ToolRunner>,
        steps: Vec<Box<dyn CaptureStep>>,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            runner,
            steps,
            temp_dir,
        }
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub async fn capture(
        &self,
        region: Option<CaptureRegion>,
    ) -> Result<CapturedImage, CaptureError> {
        for step in &self.steps {
            if !step.handles(region) {
                tracing::debug!("{} skipped for region {region:?}", step.name());
                continue;
            }
            match self.attempt(step.as_ref(), region).await {
                Ok(image) => {
                    tracing::info!(
                        "captured {}x{} with {}",
                        image.width,
                        image.height,
                        step.name()
                    );
                    return Ok(image);
                }
                Err(CaptureError::Tool(e)) if e.is_unavailable() => {
                    tracing::debug!("{} not installed, skipping", step.name());
                }
                Err(e) => {
                    tracing::warn!("{} failed: {e}", step.name());
                }
            }
        }

        Err(CaptureError::Exhausted)
    }

    async fn attempt(
        &self,
        step: &dyn CaptureStep,
        region: Option<CaptureRegion>,
    ) -> Result<CapturedImage, CaptureError> {
        let temp = tempfile::Builder::new()
            .prefix("quickocr-")
            .suffix(".png")
            .tempfile_in(&self.temp_dir)
            .map_err(CaptureError::TempFile)?;

        let result = match step.capture(self.runner.as_ref(), region, temp.path()).await {
            Ok(coverage) => decode(temp.path(), coverage, region),
            Err(e) => Err(e.into()),
        };

        let path = temp.path().to_path_buf();
        if let Err(e) = temp.close() {
            tracing::warn!("failed to remove {}: {e}", path.display());
        }

        result
    }
}

fn decode(
    path: &Path,
    coverage: Coverage,
    region: Option<CaptureRegion>,
) -> Result<CapturedImage, CaptureError> {
    let len = std::fs::metadata(path)
        .map_err(|e| CaptureError::Decode(e.to_string()))?
        .len();
    if len == 0 {
        return Err(CaptureError::Decode("tool wrote no image".to_string()));
    }

    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| CaptureError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| CaptureError::Decode(e.to_string()))?;

    let image = match (coverage, region) {
        (Coverage::FullScreen, Some(region)) => crop(image, region)?,
        _ => image,
    };

    Ok(CapturedImage::from_dynamic(image))
}

fn crop(image: DynamicImage, region: CaptureRegion) -> Result<DynamicImage, CaptureError> {
    let (x, y) = match (u32::try_from(region.x), u32::try_from(region.y)) {
        (Ok(x), Ok(y)) => (x, y),
        _ => {
            return Err(CaptureError::Decode(format!(
                "region {region} starts off screen"
            )));
        }
    };

    let fits = x
        .checked_add(region.width)
        .is_some_and(|right| right <= image.width())
        && y
            .checked_add(region.height)
            .is_some_and(|bottom| bottom <= image.height());
    if !fits {
        return Err(CaptureError::Decode(format!(
            "region {region} lies outside the {}x{} screenshot",
            image.width(),
            image.height()
        )));
    }

    Ok(image.crop_imm(x, y, region.width, region.height))
}
