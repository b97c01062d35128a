mod caching;
mod ollama;
mod tasks;

use llm_frame::prelude::*;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

/// Echoes the row text and records every request it receives.
#[derive(Clone, Default)]
pub struct CountingBackend {
    calls: Arc<AtomicUsize>,
    inputs: Arc<Mutex<Vec<String>>>,
}

impl CountingBackend {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl GenerationBackend for CountingBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(request.input.clone());
        Ok(request.input.clone())
    }
}

/// Always fails, as a server that is down would.
pub struct FailingBackend;

#[async_trait::async_trait]
impl GenerationBackend for FailingBackend {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, BackendError> {
        Err(BackendError::Api {
            status: 503,
            message: "unavailable".to_string(),
        })
    }
}

pub fn cells(items: &[Option<&str>]) -> Vec<Option<String>> {
    items.iter().map(|v| v.map(str::to_string)).collect()
}

pub fn single_column(name: &str, items: &[Option<&str>]) -> Table {
    Table::new(vec![Column::new(name, cells(items))]).unwrap()
}

/// A frame over `x` talking to `backend` with caching off.
pub fn frame(backend: &str, items: &[Option<&str>]) -> LlmFrame {
    let mut frame = LlmFrame::new(single_column("x", items));
    frame.configure(SessionUpdate::new().backend(backend).no_cache());
    frame
}
