use super::{
    api::{ApiClient, ApiConfigTrait},
    ApiConfig, GenerationBackend, LlmApiConfigTrait,
};
use crate::{error::BackendError, request::GenerationRequest};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

/// Default v1 API base url
pub const OPENAI_API_HOST: &str = "https://api.openai.com/v1";
/// Organization header
pub const OPENAI_ORGANIZATION_HEADER: &str = "OpenAI-Organization";
/// Project header
pub const OPENAI_PROJECT_HEADER: &str = "OpenAI-Project";
pub const OPENAI_COMPLETION_PATH: &str = "/chat/completions";

const RESERVED_KEYS: [&str; 3] = ["model", "messages", "stream"];

/// Any server speaking the OpenAI chat completions API: OpenAI itself,
/// llama.cpp's server, vLLM and friends.
pub struct OpenAiBackend {
    pub(crate) client: ApiClient<OpenAiConfig>,
}

impl OpenAiBackend {
    /// The api key is resolved per request, so a backend without a key can
    /// still be registered; requests through it fail with a configuration error.
    pub fn new(config: OpenAiConfig) -> Self {
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
impl GenerationBackend for OpenAiBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let res: OpenAiCompletionResponse = self
            .client
            .post(
                &self.client.config.completion_path,
                Self::request_body(request),
            )
            .await?;
        res.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                BackendError::MalformedResponse("completion has no message content".to_string())
            })
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiCompletionResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub api_config: ApiConfig,
    pub org_id: String,
    pub project_id: String,
    pub completion_path: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_config: ApiConfig {
                host: OPENAI_API_HOST.to_string(),
                port: None,
                api_key: None,
                api_key_env_var: "OPENAI_API_KEY".to_string(),
            },
            org_id: Default::default(),
            project_id: Default::default(),
            completion_path: OPENAI_COMPLETION_PATH.to_string(),
        }
    }
}

impl OpenAiConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// To use a different organization id other than default
    pub fn with_org_id<S: Into<String>>(mut self, org_id: S) -> Self {
        self.org_id = org_id.into();
        self
    }

    /// Non default project id
    pub fn with_project_id<S: Into<String>>(mut self, project_id: S) -> Self {
        self.project_id = project_id.into();
        self
    }

    pub fn with_completion_path<S: Into<String>>(mut self, path: S) -> Self {
        self.completion_path = path.into();
        self
    }
}

impl LlmApiConfigTrait for OpenAiConfig {
    fn api_base_config_mut(&mut self) -> &mut ApiConfig {
        &mut self.api_config
    }

    fn api_config(&self) -> &ApiConfig {
        &self.api_config
    }
}

fn header_value(value: &str, name: &str) -> Result<HeaderValue, BackendError> {
    HeaderValue::from_str(value).map_err(|_| {
        BackendError::Configuration(format!("Failed to create header value from {name} value"))
    })
}

impl ApiConfigTrait for OpenAiConfig {
    fn headers(&self) -> Result<HeaderMap, BackendError> {
        let mut headers = HeaderMap::new();

        if !self.org_id.is_empty() {
            headers.insert(
                OPENAI_ORGANIZATION_HEADER,
                header_value(&self.org_id, "org_id")?,
            );
        }
        if !self.project_id.is_empty() {
            headers.insert(
                OPENAI_PROJECT_HEADER,
                header_value(&self.project_id, "project_id")?,
            );
        }
        let api_key = self.api_config.load_api_key()?;
        headers.insert(
            AUTHORIZATION,
            header_value(
                &format!("Bearer {}", api_key.expose_secret()),
                "authorization",
            )?,
        );

        Ok(headers)
    }

    fn url(&self, path: &str) -> String {
        self.api_config.url(path)
    }
}
