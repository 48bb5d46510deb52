use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        generation_client::{AzureGenerationClient, GenerationClient},
        practice_service::PracticeService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub practice_service: Arc<PracticeService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client: Arc<dyn GenerationClient> = Arc::new(AzureGenerationClient::new(&config));
        Self::with_client(config, client)
    }

    /// Wires the services around an already-built client.
    pub fn with_client(config: Config, client: Arc<dyn GenerationClient>) -> Self {
        let practice_service = Arc::new(PracticeService::from_config(client, &config));

        Self {
            practice_service,
            config: Arc::new(config),
        }
    }
}
