//! Warm command handler.

use color_eyre::Result;

use crate::config::Config;
use crate::facade::PersistenceFacade;

use super::App;

impl App {
    /// Build both materialized views so first requests skip the build cost.
    ///
    /// Views that already exist are served as-is; this command never forces
    /// a rebuild.
    pub async fn run_warm(&self) -> Result<()> {
        let config = Config::load()?;

        let facade = PersistenceFacade::connect(config)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to connect: {}", e))?;

        let counts = facade
            .institute_faculty_counts()
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Institute count view failed: {}", e))?;
        tracing::info!("Institute faculty counts ready: {} institutions", counts.len());

        let keywords = facade
            .faculty_keyword_listing()
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Faculty keyword view failed: {}", e))?;
        tracing::info!("Faculty keyword listing ready: {} faculty", keywords.len());

        facade.shutdown().await;
        Ok(())
    }
}
