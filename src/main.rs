use coop_boxpush::GameConfig;
use coop_boxpush::runner::{RunnerConfig, run_batch};
use dotenv::dotenv;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("coop_boxpush=info,warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging()?;

    let config = GameConfig::from_env()?;
    let runner = RunnerConfig::from_env()?;

    tracing::info!(
        "Running {} episodes with the {:?} policy (horizon {}, {} workers, seed {})",
        runner.episodes,
        runner.policy,
        config.horizon,
        runner.workers,
        runner.seed
    );

    let metrics = run_batch(config, runner).await?;
    metrics.log_summary();

    Ok(())
}
