pub mod content_pool;
pub mod coverage;
pub mod deduplicator;
pub mod generation_client;
pub mod pipeline;
pub mod practice_service;
pub mod prompt_builder;
pub mod response_extractor;

pub use generation_client::{AzureGenerationClient, GenerationClient};
pub use practice_service::PracticeService;
