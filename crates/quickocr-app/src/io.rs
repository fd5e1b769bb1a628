use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use kanal::{AsyncSender, Sender};
use quickocr_ocr::HotkeyManager;
use quickocr_types::{AppEvent, CaptureRegion};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub const COMMANDS: &str = "ocr [X,Y WxH], lang <eng|chi_sim|eng+chi_sim>, langs, status, quit";

/// Hotkey listener plus console commands on stdin, both feeding the event loop
pub async fn watcher_io(
    state: Arc<AppState>,
    poll_interval: Duration,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let hotkey = if state.config.hotkey.enabled {
        Some(spawn_hotkey_listener(
            state.config.hotkey.binding.clone(),
            poll_interval,
            cancel.clone(),
            event_tx.clone().to_sync(),
        ))
    } else {
        tracing::info!("OCR hotkey disabled");
        None
    };

    let result = console_commands(cancel.clone(), event_tx).await;

    if let Some(handle) = hotkey {
        // The listener notices cancellation within one poll interval
        cancel.cancel();
        if let Err(e) = handle.await {
            tracing::error!("hotkey listener panicked: {e}");
        }
    }

    result
}

fn spawn_hotkey_listener(
    binding: String,
    poll_interval: Duration,
    cancel: CancellationToken,
    tx: Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let hotkey_manager = match HotkeyManager::from_binding(&binding) {
            Ok(manager) => manager,
            Err(e) => {
                tracing::error!("Failed to create OCR hotkey manager: {e:#}");
                return;
            }
        };

        tracing::info!("OCR hotkey registered ({binding})");

        while !cancel.is_cancelled() {
            if hotkey_manager.poll() {
                tracing::info!("OCR hotkey pressed");
                if let Err(e) = tx.send(AppEvent::TriggerOcr(None)) {
                    tracing::warn!("event loop gone, dropping hotkey trigger: {e}");
                    break;
                }
            }

            // Sleep briefly to avoid busy loop
            std::thread::sleep(poll_interval);
        }

        tracing::info!("OCR hotkey listener stopping");
    })
}

async fn console_commands(
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line.context("Failed to read console input")?,
        };

        let Some(line) = line else {
            // Detached stdin: keep running on the hotkey alone
            tracing::debug!("console input closed");
            cancel.cancelled().await;
            break;
        };

        match parse_command(&line) {
            Ok(Some(event)) => event_tx
                .send(event)
                .await
                .context("Failed to send console command to app")?,
            Ok(None) => {}
            Err(e) => println!("{e:#}\ncommands: {COMMANDS}"),
        }
    }

    tracing::info!("Console listener stopping");
    Ok(())
}

/// Parse one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> anyhow::Result<Option<AppEvent>> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let rest = words.collect::<Vec<_>>().join(" ");

    let event = match command.to_ascii_lowercase().as_str() {
        "ocr" | "capture" if rest.is_empty() => AppEvent::TriggerOcr(None),
        "ocr" | "capture" => {
            let region: CaptureRegion = rest.parse()?;
            AppEvent::TriggerOcr(Some(region))
        }
        "lang" | "language" if rest.is_empty() => AppEvent::ListLanguages,
        "lang" | "language" => AppEvent::SetLanguage(rest),
        "langs" | "languages" => AppEvent::ListLanguages,
        "status" => AppEvent::ShowStatus,
        "quit" | "exit" => AppEvent::Quit,
        other => bail!("unknown command '{other}'"),
    };

    Ok(Some(event))
}
