//! Ping command handler.

use color_eyre::Result;

use crate::config::Config;
use crate::facade::PersistenceFacade;

use super::App;

impl App {
    /// Connect to all three stores and report readiness.
    pub async fn run_ping(&self) -> Result<()> {
        let config = Config::load()?;

        let facade = PersistenceFacade::connect(config)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Store connectivity check failed: {}", e))?;
        tracing::info!("All stores reachable");

        facade.shutdown().await;
        Ok(())
    }
}
