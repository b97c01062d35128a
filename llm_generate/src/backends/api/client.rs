use super::config::ApiConfigTrait;
use crate::error::{
    map_deserialization_error, map_serialization_error, BackendError, WrappedError,
};
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, Clone)]
pub(crate) struct ApiClient<C: ApiConfigTrait> {
    http_client: reqwest::Client,
    pub config: C,
}

impl<C: ApiConfigTrait> ApiClient<C> {
    pub fn new(config: C) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            config,
        }
    }

    /// Make a POST request to {path} and deserialize the response body
    pub(crate) async fn post<I, O>(&self, path: &str, request: I) -> Result<O, BackendError>
    where
        I: Serialize + std::fmt::Debug,
        O: DeserializeOwned,
    {
        let serialized_request = serde_json::to_string(&request).map_err(map_serialization_error)?;
        crate::trace!("Serialized request: {}", serialized_request);
        let request = self
            .http_client
            .post(self.config.url(path))
            .headers(self.config.headers()?)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(serialized_request)
            .build()?;
        self.execute(request).await
    }

    /// Execute a HTTP request once. Failures are returned to the caller as is;
    /// nothing here retries.
    async fn execute<O>(&self, request: reqwest::Request) -> Result<O, BackendError>
    where
        O: DeserializeOwned,
    {
        let response = self.http_client.execute(request).await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            // Deserialize the error object if there is one, otherwise keep the raw body
            let message = match serde_json::from_slice::<WrappedError>(bytes.as_ref()) {
                Ok(wrapped_error) => wrapped_error.error.into_message(),
                Err(_) => String::from_utf8_lossy(bytes.as_ref()).trim().to_string(),
            };
            crate::warn!("Backend returned {}: {}", status, message);
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // Deserialize once into a generic Value
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| map_deserialization_error(e, &bytes))?;

        // Log the pretty-printed JSON
        let pretty_json = serde_json::to_string_pretty(&value).map_err(map_serialization_error)?;
        crate::trace!("Serialized response: {}", pretty_json);

        // Convert the Value into the target type
        let response: O =
            serde_json::from_value(value).map_err(|e| map_deserialization_error(e, &bytes))?;

        Ok(response)
    }
}
