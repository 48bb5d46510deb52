pub mod content_pool;
pub mod prompts;
