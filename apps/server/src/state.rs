//! Shared application state handed to every handler

use crate::{config::Config, db::PatientStore, services::PatientService, startup};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub patients: PatientService,
}

impl AppState {
    /// Connect the configured store and build the state around it.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = startup::connect_store(&config.database).await?;
        Ok(Self::with_store(config, store))
    }

    /// Build state around an already constructed store.
    pub fn with_store(config: Config, store: Arc<dyn PatientStore>) -> Self {
        Self {
            config: Arc::new(config),
            patients: PatientService::new(store),
        }
    }
}
