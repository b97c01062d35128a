// Internal modules
mod api;

// Public modules
pub mod deterministic;
pub mod ollama;
pub mod openai;

// Internal imports
use crate::{error::BackendError, request::GenerationRequest};
use deterministic::{EchoBackend, TestBackend};
use ollama::{OllamaBackend, OllamaConfig};
use openai::{OpenAiBackend, OpenAiConfig};
use std::{collections::HashMap, sync::Arc};

// Public exports
pub use api::{ApiConfig, LlmApiConfigTrait};

pub const OLLAMA_BACKEND: &str = "ollama";
pub const OPENAI_BACKEND: &str = "openai";
/// Reserved for deterministic testing. Always answers with an empty response.
pub const TEST_BACKEND: &str = "test";
/// Deterministic backend that answers with the row text itself.
pub const ECHO_BACKEND: &str = "echo";

/// A text generation provider. One call per row; the backend receives the
/// prompt, the row text and the model settings, and returns the raw text.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError>;
}

/// Maps backend names to implementations. Lookups happen at call time, so an
/// unknown name is only an error when a row is actually generated.
#[derive(Clone)]
pub struct BackendRegistry {
    backends: HashMap<String, Arc<dyn GenerationBackend>>,
}

impl Default for BackendRegistry {
    /// `ollama`, `openai`, `test` and `echo`, with hosts and keys taken from
    /// the environment.
    fn default() -> Self {
        let mut registry = Self::new();
        registry
            .register(OLLAMA_BACKEND, OllamaBackend::new(OllamaConfig::default()))
            .register(OPENAI_BACKEND, OpenAiBackend::new(OpenAiConfig::default()))
            .register(TEST_BACKEND, TestBackend)
            .register(ECHO_BACKEND, EchoBackend);
        registry
    }
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
        }
    }

    /// Adds or replaces the backend registered under `name`.
    pub fn register<S, B>(&mut self, name: S, backend: B) -> &mut Self
    where
        S: Into<String>,
        B: GenerationBackend + 'static,
    {
        self.register_arc(name, Arc::new(backend))
    }

    pub fn register_arc<S: Into<String>>(
        &mut self,
        name: S,
        backend: Arc<dyn GenerationBackend>,
    ) -> &mut Self {
        let name = name.into();
        crate::debug!("Registering backend {name:?}");
        self.backends.insert(name, backend);
        self
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn GenerationBackend>, BackendError> {
        self.backends
            .get(name)
            .cloned()
            .ok_or_else(|| BackendError::UnknownBackend(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.backends.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.backends.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.names())
            .finish()
    }
}
