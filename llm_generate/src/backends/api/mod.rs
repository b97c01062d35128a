// Internal modules
mod client;
mod config;

// Internal exports
pub(crate) use client::ApiClient;
pub(crate) use config::ApiConfigTrait;

// Public exports
pub use config::{ApiConfig, LlmApiConfigTrait};
