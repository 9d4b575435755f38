// src/main.rs

use std::process::ExitCode;
use std::sync::Arc;

use secret_fetch_action::config::{LogFormat, RunnerConfig};
use secret_fetch_action::sys::aws::AwsSecretsManagerConnector;
use secret_fetch_action::sys::host::{ActualValueVerifier, InMemoryBuffers};
use secret_fetch_action::sys::traits::ResultState;
use secret_fetch_action::SecretFetchAction;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // ==============================================================================
    // 1. Configuration & Logging
    // ==============================================================================

    let config = RunnerConfig::load()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let test_action = config.load_test_action()?;

    // ==============================================================================
    // 2. Capability Wiring & Execution
    // ==============================================================================

    // Concrete capabilities are injected here and nowhere else: the action itself
    // only ever sees the host and secret-store traits.
    //
    // The runner owns the buffer store so it can report what was delivered once the
    // action returns. Only buffer NAMES are printed; the values die with the process.
    let buffers = Arc::new(InMemoryBuffers::new());
    let action = SecretFetchAction::new(
        Arc::new(AwsSecretsManagerConnector::new(config.endpoint_url.clone())),
        buffers.clone(),
        Arc::new(ActualValueVerifier),
    );

    tracing::info!(params = %config.params_path.display(), "Running secret fetch action");
    let result = action.execute(&test_action).await;

    // ==============================================================================
    // 3. Reporting
    // ==============================================================================

    println!("{}", result.render());
    for outcome in test_action.outcomes() {
        let state = match outcome.state {
            ResultState::Ok => "OK",
            ResultState::Failed => "FAILED",
        };
        println!("[{}] {}: {}", state, outcome.parameter, outcome.message);
    }
    for name in buffers.names() {
        println!("[BUFFER] {} written", name);
    }

    Ok(if result.is_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
