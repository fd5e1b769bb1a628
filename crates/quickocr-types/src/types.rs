use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Run one capture-and-recognize cycle. `None` lets the capture tool prompt for a selection.
    TriggerOcr(Option<CaptureRegion>),
    SetLanguage(String),
    ListLanguages,
    ShowStatus,
    OcrStatusUpdate {
        status: String,
        capturing: bool,
    },
    Notify(Notification),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub level: NotificationLevel,
}

/// Screen rectangle in pixels. Width and height are never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRegion")]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Deserialize)]
struct RawRegion {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl TryFrom<RawRegion> for CaptureRegion {
    type Error = InvalidRegion;

    fn try_from(raw: RawRegion) -> Result<Self, Self::Error> {
        CaptureRegion::new(raw.x, raw.y, raw.width, raw.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRegion {
    #[error("region must have a non-zero size, got {width}x{height}")]
    Empty { width: u32, height: u32 },

    #[error("unrecognized geometry '{0}', expected \"X,Y WxH\" or \"WxH+X+Y\"")]
    Malformed(String),
}

impl CaptureRegion {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Result<Self, InvalidRegion> {
        if width == 0 || height == 0 {
            return Err(InvalidRegion::Empty { width, height });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Geometry string in the `X,Y WxH` form accepted by `grim -g`
    pub fn geometry(&self) -> String {
        format!("{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

impl fmt::Display for CaptureRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.geometry())
    }
}

impl FromStr for CaptureRegion {
    type Err = InvalidRegion;

    /// Accepts the selector format `X,Y WxH` as well as X11 style `WxH+X+Y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let malformed = || InvalidRegion::Malformed(trimmed.to_string());

        let (x, y, width, height) = if let Some((pos, size)) = trimmed.split_once(' ') {
            let (x, y) = pos.split_once(',').ok_or_else(malformed)?;
            let (w, h) = size.trim().split_once('x').ok_or_else(malformed)?;
            (x, y, w, h)
        } else {
            let (w, rest) = trimmed.split_once('x').ok_or_else(malformed)?;
            let mut parts = rest.split('+');
            let h = parts.next().ok_or_else(malformed)?;
            let x = parts.next().ok_or_else(malformed)?;
            let y = parts.next().ok_or_else(malformed)?;
            if parts.next().is_some() {
                return Err(malformed());
            }
            (x, y, w, h)
        };

        let x = x.trim().parse().map_err(|_| malformed())?;
        let y = y.trim().parse().map_err(|_| malformed())?;
        let width = width.trim().parse().map_err(|_| malformed())?;
        let height = height.trim().parse().map_err(|_| malformed())?;

        CaptureRegion::new(x, y, width, height)
    }
}
