pub use crate::{
    components::{
        cache::{CacheKey, CacheStore},
        generation::GenerationClient,
        labels::{ExtractLabels, Labels},
        prompt::{Prompt, Task, DEFAULT_MAX_WORDS, DEFAULT_SENTIMENT_OPTIONS},
        validator::validate,
    },
    error::FrameError,
    frame::LlmFrame,
    logging::{LoggingConfig, LoggingConfigTrait},
    mapper::RowMapper,
    session::{SessionConfig, SessionUpdate},
    table::{Column, Table},
};
pub use llm_generate::{
    ApiConfig, BackendError, BackendRegistry, EchoBackend, GenerationBackend,
    GenerationRequest, LlmApiConfigTrait, OllamaBackend, OllamaConfig, OpenAiBackend,
    OpenAiConfig, TestBackend, ECHO_BACKEND, OLLAMA_BACKEND, OPENAI_BACKEND, TEST_BACKEND,
};
#[cfg(test)]
pub use serial_test::serial;
