/// Something on screen that triggered the capture and may sit on top of it
pub trait CaptureSurface: Send + Sync {
    /// Whether the surface currently shows a window that could occlude the capture
    fn is_visible(&self) -> bool;
    fn hide(&self);
    fn show(&self);
}

/// Surface with nothing to hide: the CLI, the tray icon, the hotkey
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSurface;

impl CaptureSurface for NoSurface {
    fn is_visible(&self) -> bool {
        false
    }

    fn hide(&self) {}

    fn show(&self) {}
}

/// RAII guard that hides a surface for the duration of a capture
///
/// The surface is shown again when the guard is dropped, on every exit path
/// including errors and cancelled selections. A surface that was not visible
/// when the guard was acquired is left alone.
pub struct SurfaceGuard<'a> {
    surface: &'a dyn CaptureSurface,
    hidden: bool,
}

impl<'a> SurfaceGuard<'a> {
    pub fn acquire(surface: &'a dyn CaptureSurface) -> Self {
        let hidden = surface.is_visible();
        if hidden {
            tracing::debug!("hiding surface for capture");
            surface.hide();
        }
        Self { surface, hidden }
    }

    /// Whether acquiring the guard actually hid something
    pub fn hid_surface(&self) -> bool {
        self.hidden
    }
}

impl Drop for SurfaceGuard<'_> {
    fn drop(&mut self) {
        if self.hidden {
            tracing::debug!("restoring surface after capture");
            self.surface.show();
        }
    }
}
