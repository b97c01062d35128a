use crate::session::SessionConfig;
use llm_generate::{BackendError, BackendRegistry, GenerationRequest};
use std::sync::Arc;

/// Sends one row to the backend named by the session.
#[derive(Clone, Debug)]
pub struct GenerationClient {
    registry: Arc<BackendRegistry>,
}

impl GenerationClient {
    pub fn new(registry: Arc<BackendRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub async fn generate(
        &self,
        row_text: &str,
        prompt: &str,
        session: &SessionConfig,
    ) -> Result<String, BackendError> {
        self.send(&session.backend, &session.request(prompt, row_text))
            .await
    }

    /// Awaits `backend` for `request`. Blank responses are an error.
    pub async fn send(
        &self,
        backend: &str,
        request: &GenerationRequest,
    ) -> Result<String, BackendError> {
        let response = self.registry.get(backend)?.generate(request).await?;
        if response.trim().is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(response)
    }
}
