//! Debug Serial Simulator - Main Entry Point

use anyhow::Context;
use serial_sim::{init_logging, load_config, run_demo};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load simulator configuration")?;
    init_logging(&config.log_level);

    info!("=== Debug Serial Simulator v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Clock {} Hz, {} baud, speedup x{}",
        config.serial.clock_hz, config.serial.baud, config.speedup
    );

    run_demo(&config, std::io::stdout()).await?;

    Ok(())
}
