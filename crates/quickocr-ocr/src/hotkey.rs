use std::str::FromStr;

use anyhow::{Context, Result};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState, hotkey::HotKey};

pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    hotkey: HotKey,
}

impl HotkeyManager {
    /// Register an accelerator such as `ctrl+shift+o` or `f9`
    pub fn from_binding(binding: &str) -> Result<Self> {
        let hotkey = parse_binding(binding)?;
        Self::with_hotkey(hotkey)
    }

    pub fn with_hotkey(hotkey: HotKey) -> Result<Self> {
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;

        manager
            .register(hotkey)
            .context("Failed to register hotkey")?;

        Ok(Self { manager, hotkey })
    }

    /// Check if hotkey was pressed (non-blocking). Releases are ignored.
    pub fn poll(&self) -> bool {
        let receiver = GlobalHotKeyEvent::receiver();
        while let Ok(event) = receiver.try_recv() {
            if event.id != self.hotkey.id() {
                tracing::debug!(
                    "hotkey event for unknown id {}, expected {}",
                    event.id,
                    self.hotkey.id()
                );
                continue;
            }
            if event.state == HotKeyState::Pressed {
                return true;
            }
        }
        false
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        let _ = self.manager.unregister(self.hotkey);
    }
}

pub fn parse_binding(binding: &str) -> Result<HotKey> {
    HotKey::from_str(binding.trim()).with_context(|| format!("Invalid hotkey '{binding}'"))
}
