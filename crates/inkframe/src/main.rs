//! inkframe entry point.

use std::process::ExitCode;

use chrono::Utc;
use tracing::error;

use inkframe::config::Config;
use inkframe::pipeline;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = inkframe_core::tracing::init_tracing(inkframe_core::tracing::TracingConfig::batch()) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match pipeline::run(&config, Utc::now()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
