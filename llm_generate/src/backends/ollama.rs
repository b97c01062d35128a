use super::{
    api::{ApiClient, ApiConfigTrait},
    ApiConfig, GenerationBackend, LlmApiConfigTrait,
};
use crate::{error::BackendError, request::GenerationRequest};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

/// Default local server address
pub const OLLAMA_API_HOST: &str = "http://localhost:11434";
pub const OLLAMA_HOST_ENV_VAR: &str = "OLLAMA_HOST";
pub const OLLAMA_CHAT_PATH: &str = "/api/chat";

/// Body keys the backend sets itself. Extra options can not override them.
const RESERVED_KEYS: [&str; 3] = ["model", "messages", "stream"];

/// Local model server speaking the Ollama chat API.
pub struct OllamaBackend {
    pub(crate) client: ApiClient<OllamaConfig>,
}

impl OllamaBackend {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            client: ApiClient::new(config),
        }
    }

    fn request_body(request: &GenerationRequest) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert("model".to_string(), json!(request.model));
        body.insert(
            "messages".to_string(),
            json!([{ "role": "user", "content": request.content() }]),
        );
        body.insert("stream".to_string(), json!(false));
        request.merge_options(&mut body, &RESERVED_KEYS);
        serde_json::Value::Object(body)
    }
}

#[async_trait::async_trait]
impl GenerationBackend for OllamaBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let res: OllamaChatResponse = self
            .client
            .post(OLLAMA_CHAT_PATH, Self::request_body(request))
            .await?;
        match res.message {
            Some(message) => Ok(message.content),
            None => Err(BackendError::MalformedResponse(
                "chat response has no message".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

#[derive(Clone, Debug)]
pub struct OllamaConfig {
    pub api_config: ApiConfig,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            api_config: ApiConfig {
                host: ApiConfig::host_from_env(OLLAMA_HOST_ENV_VAR, OLLAMA_API_HOST),
                port: None,
                api_key: None,
                api_key_env_var: "OLLAMA_API_KEY".to_string(),
            },
        }
    }
}

impl OllamaConfig {
    pub fn new() -> Self {
        Default::default()
    }
}

impl LlmApiConfigTrait for OllamaConfig {
    fn api_base_config_mut(&mut self) -> &mut ApiConfig {
        &mut self.api_config
    }

    fn api_config(&self) -> &ApiConfig {
        &self.api_config
    }
}

impl ApiConfigTrait for OllamaConfig {
    // A local server needs no auth. A key is only sent when one was set explicitly,
    // for servers sitting behind a proxy.
    fn headers(&self) -> Result<HeaderMap, BackendError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_config.api_key {
            let value = HeaderValue::from_str(&format!(
                "Bearer {}",
                api_key.expose_secret()
            ))
            .map_err(|_| {
                BackendError::Configuration(
                    "Failed to create header value from authorization value".to_string(),
                )
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn url(&self, path: &str) -> String {
        self.api_config.url(path)
    }
}
