//! Rewards API Gateway binary.

use anyhow::Context;
use rewards_api::{GatewayConfig, RewardsGateway};
use rewards_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())
        .context("failed to initialize telemetry")?;

    let config = GatewayConfig::from_env().context("invalid gateway configuration")?;
    info!(
        addr = %config.http_addr(),
        tokens = config.auth.tokens.len(),
        countdown_secs = config.rewards.session_countdown_secs,
        "rewards gateway configured"
    );

    RewardsGateway::from_config(config)?.serve().await?;
    Ok(())
}
