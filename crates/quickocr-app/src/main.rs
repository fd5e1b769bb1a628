use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use quickocr_config::Config;
use quickocr_core::Pipeline;

mod cli;
mod controller;
mod events;
mod io;
mod logging;
mod ocr_context;
mod oneshot;
mod state;
mod status;
mod ui;

#[cfg(test)]
mod tests;

use self::cli::{Action, Cli};
use self::controller::AppController;
use self::state::AppState;

fn main() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(run(cli));

    // A pending stdin read sits on a blocking thread that never returns by itself
    runtime.shutdown_timeout(Duration::from_millis(500));
    code
}

async fn run(cli: Cli) -> ExitCode {
    let mut config = Config::new();
    if let Some(language) = cli.lang {
        config.ocr.language = language;
    }

    match cli.action {
        Some(Action::Ocr) => oneshot::run_direct_ocr(&config, config.ocr.language, cli.region).await,
        None => match run_long_running(config, &cli).await {
            Ok(code) => code,
            Err(e) => {
                tracing::error!("{e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn has_graphical_session() -> bool {
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|value| !value.is_empty()))
}

async fn run_long_running(config: Config, cli: &Cli) -> anyhow::Result<ExitCode> {
    if !has_graphical_session() {
        eprintln!("No graphical session found: neither DISPLAY nor WAYLAND_DISPLAY is set");
        return Ok(ExitCode::FAILURE);
    }

    let pipeline = Pipeline::from_config(&config);
    if !oneshot::ensure_backend(pipeline.recognizer()).await {
        return Ok(ExitCode::FAILURE);
    }
    oneshot::warn_missing_packs(pipeline.recognizer(), config.ocr.language).await;

    let hotkey = config
        .hotkey
        .enabled
        .then(|| config.hotkey.binding.clone());
    let state = Arc::new(AppState::new(config, pipeline, cli.region));
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks();

    match hotkey {
        Some(binding) => println!("Quick OCR started. Press {binding} or type a command."),
        None => println!("Quick OCR started. Type a command."),
    }
    println!("commands: {}", io::COMMANDS);

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for ctrl+c")?;
            tracing::info!("Shutdown requested");
        }
        _ = controller.cancelled() => {}
        Some(result) = tasks.join_next() => log_task_exit(result),
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        log_task_exit(result);
    }

    Ok(ExitCode::SUCCESS)
}

fn log_task_exit(result: Result<anyhow::Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => tracing::debug!("task exited"),
        Ok(Err(e)) => tracing::error!("task failed: {e:#}"),
        Err(e) => tracing::error!("task panicked: {e}"),
    }
}
