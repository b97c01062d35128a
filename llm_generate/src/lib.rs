#[allow(unused_imports)]
pub(crate) use tracing::{debug, error, info, span, trace, warn, Level};

pub mod backends;
pub mod error;
pub mod request;

// Public exports
pub use backends::{
    deterministic::{EchoBackend, TestBackend},
    ollama::{OllamaBackend, OllamaConfig},
    openai::{OpenAiBackend, OpenAiConfig},
    ApiConfig, BackendRegistry, GenerationBackend, LlmApiConfigTrait, ECHO_BACKEND,
    OLLAMA_BACKEND, OPENAI_BACKEND, TEST_BACKEND,
};
pub use error::BackendError;
pub use request::GenerationRequest;
