//! Battle client entry point.
use std::sync::Arc;

use anyhow::Result;
use battle_runtime::{BattleRuntime, RuntimeConfig};
use client_frontend_cli::{AutoplayFrontend, CliConfig, DemoEngine, FrontendConfig, logging};
use client_frontend_core::{BattleSession, Frontend};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let cli_config = CliConfig::from_env()?;
    let frontend_config = FrontendConfig::from_env();

    // Keep the guard alive so buffered log lines reach the file.
    let _guard = logging::setup_logging(&cli_config)?;

    // The automated side uses the runtime's seeded random decider.
    let runtime = BattleRuntime::builder()
        .engine(Arc::new(DemoEngine::new(cli_config.format)))
        .config(RuntimeConfig {
            decider_seed: cli_config.seed,
            ..RuntimeConfig::default()
        })
        .build()?;
    let session = BattleSession::new(runtime, frontend_config);

    let mut frontend = AutoplayFrontend::new(cli_config, std::io::stdout());
    let result = frontend.run(session).await?;

    println!("Battle over: {result}");
    tracing::info!(%result, "client exiting");
    Ok(())
}
