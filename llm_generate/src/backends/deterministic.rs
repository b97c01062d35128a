use super::GenerationBackend;
use crate::{error::BackendError, request::GenerationRequest};

/// Never contacts a model and always answers with an empty response, which
/// callers treat as a missing value.
#[derive(Clone, Copy, Debug, Default)]
pub struct TestBackend;

#[async_trait::async_trait]
impl GenerationBackend for TestBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        crate::trace!("test backend called for model {:?}", request.model);
        Ok(String::new())
    }
}

/// Answers with the row text unchanged. Useful for exercising response
/// validation without a model.
#[derive(Clone, Copy, Debug, Default)]
pub struct EchoBackend;

#[async_trait::async_trait]
impl GenerationBackend for EchoBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        Ok(request.input.clone())
    }
}
