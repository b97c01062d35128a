use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// No backend is registered under the requested name
    #[error("UnknownBackend: no backend registered as {0:?}")]
    UnknownBackend(String),
    /// Underlying error from reqwest library after an API call was made
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Backend answered with a non-success status
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("failed to serialize backend request: {0}")]
    JsonSerialize(serde_json::Error),
    /// Error when a response cannot be deserialized into a Rust type
    #[error("failed to deserialize backend response: {0}")]
    JsonDeserialize(serde_json::Error),
    /// Response decoded, but did not carry generated text where expected
    #[error("MalformedResponse: {0}")]
    MalformedResponse(String),
    #[error("ResponseContentEmpty: Response had no content")]
    EmptyResponse,
    /// Missing api key, bad header value, and similar client side problems
    #[error("invalid backend configuration: {0}")]
    Configuration(String),
}

/// Wrapper to deserialize the error object nested in "error" JSON key
#[derive(Debug, Deserialize)]
pub(crate) struct WrappedError {
    pub(crate) error: ErrorDetail,
}

/// OpenAI style servers nest an object, Ollama returns a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorDetail {
    Message(String),
    Object {
        message: String,
        r#type: Option<String>,
    },
}

impl ErrorDetail {
    pub(crate) fn into_message(self) -> String {
        match self {
            ErrorDetail::Message(message) => message,
            ErrorDetail::Object {
                message,
                r#type: Some(kind),
            } => format!("{kind}: {message}"),
            ErrorDetail::Object { message, .. } => message,
        }
    }
}

pub(crate) fn map_deserialization_error(e: serde_json::Error, bytes: &[u8]) -> BackendError {
    tracing::error!(
        "failed deserialization of: {}",
        String::from_utf8_lossy(bytes)
    );
    BackendError::JsonDeserialize(e)
}

pub(crate) fn map_serialization_error(e: serde_json::Error) -> BackendError {
    tracing::error!("failed serialization: {}", e);
    BackendError::JsonSerialize(e)
}
