use crate::error::BackendError;
use reqwest::header::HeaderMap;
use secrecy::Secret;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Scheme and host, e.g. `http://localhost` or `https://api.openai.com/v1`.
    /// A host without a scheme is treated as plain http.
    pub host: String,
    pub port: Option<String>,
    pub api_key: Option<Secret<String>>,
    pub api_key_env_var: String,
}

impl ApiConfig {
    pub(crate) fn load_api_key(&self) -> Result<Secret<String>, BackendError> {
        if let Some(api_key) = self.api_key.as_ref() {
            crate::trace!("Using api_key from parameter");
            return Ok(api_key.to_owned());
        }
        crate::trace!("api_key not set. Attempting to load from .env");
        dotenvy::dotenv().ok();

        match dotenvy::var(&self.api_key_env_var) {
            Ok(api_key) => {
                crate::trace!("Successfully loaded api_key from .env");
                Ok(Secret::new(api_key))
            }
            Err(_) => {
                crate::trace!(
                    "{} not found in dotenv, nor was it set manually",
                    self.api_key_env_var
                );
                Err(BackendError::Configuration(format!(
                    "Failed to load api_key from parameter or {}",
                    self.api_key_env_var
                )))
            }
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        let host = if self.host.contains("://") {
            self.host.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", self.host.trim_end_matches('/'))
        };
        match &self.port {
            Some(port) => format!("{}:{}{}", host, port, path),
            None => format!("{}{}", host, path),
        }
    }

    /// Reads a host override from the environment (loading `.env` first),
    /// falling back to `default`.
    pub(crate) fn host_from_env(env_var: &str, default: &str) -> String {
        dotenvy::dotenv().ok();
        match dotenvy::var(env_var) {
            Ok(host) if !host.trim().is_empty() => {
                crate::trace!("Using host from {env_var}");
                host.trim().to_string()
            }
            _ => default.to_string(),
        }
    }
}

pub trait LlmApiConfigTrait {
    fn api_base_config_mut(&mut self) -> &mut ApiConfig;

    fn api_config(&self) -> &ApiConfig;

    fn with_api_host<S: AsRef<str>>(mut self, host: S) -> Self
    where
        Self: Sized,
    {
        self.api_base_config_mut().host = host.as_ref().to_string();
        self
    }

    fn with_api_port<S: AsRef<str>>(mut self, port: S) -> Self
    where
        Self: Sized,
    {
        self.api_base_config_mut().port = Some(port.as_ref().to_string());
        self
    }

    fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self
    where
        Self: Sized,
    {
        self.api_base_config_mut().api_key = Some(Secret::new(api_key.into()));
        self
    }

    /// Set the environment variable name for the API key. Default is set from the backend.
    fn with_api_key_env_var<S: Into<String>>(mut self, api_key_env_var: S) -> Self
    where
        Self: Sized,
    {
        self.api_base_config_mut().api_key_env_var = api_key_env_var.into();
        self
    }
}

pub(crate) trait ApiConfigTrait {
    fn headers(&self) -> Result<HeaderMap, BackendError>;

    fn url(&self, path: &str) -> String;
}
