#![warn(missing_docs)]
//! # authentiscan-app binary
//!
//! Headless entry point: initializes logging, validates configuration, and
//! wires a controller to an in-memory page.

use std::process::ExitCode;

use authentiscan_app::{AppConfig, AppError, HeadlessSurface, UploadAnalysisController, app_version};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authentiscan_app=info,authentiscan_detect=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "startup failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let source = config.build_source()?;

    tracing::info!(
        version = app_version(),
        strategy = ?config.strategy,
        progress_interval_ms = config.progress_interval.as_millis() as u64,
        "authentiscan starting"
    );

    let controller =
        UploadAnalysisController::new(HeadlessSurface::new(), source, config.progress_plan());
    let state = controller.state();
    println!(
        "authentiscan {} ready (strategy={:?}, tab={})",
        app_version(),
        config.strategy,
        state.active_media_type
    );

    Ok(())
}
