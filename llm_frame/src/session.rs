use llm_generate::{GenerationRequest, OLLAMA_BACKEND};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub const DEFAULT_BACKEND: &str = OLLAMA_BACKEND;
pub const DEFAULT_MODEL: &str = "llama3.2";
pub const DEFAULT_CACHE_PATH: &str = "_llm_frame_cache";

pub const BACKEND_ENV_VAR: &str = "LLM_FRAME_BACKEND";
pub const MODEL_ENV_VAR: &str = "LLM_FRAME_MODEL";
pub const CACHE_ENV_VAR: &str = "LLM_FRAME_CACHE";

/// Which backend and model to use, where to cache responses, and the extra
/// model settings forwarded with every request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub backend: String,
    pub model: String,
    /// `None` disables caching.
    pub cache_path: Option<PathBuf>,
    #[serde(default)]
    pub extra_options: BTreeMap<String, serde_json::Value>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            model: DEFAULT_MODEL.to_string(),
            cache_path: Some(PathBuf::from(DEFAULT_CACHE_PATH)),
            extra_options: BTreeMap::new(),
        }
    }
}

impl SessionConfig {
    /// Defaults, overridden by `LLM_FRAME_BACKEND`, `LLM_FRAME_MODEL` and
    /// `LLM_FRAME_CACHE` when set. A `.env` file is loaded first if present.
    /// An empty `LLM_FRAME_CACHE` disables caching.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut update = SessionUpdate::new();
        if let Ok(backend) = dotenvy::var(BACKEND_ENV_VAR) {
            update = update.backend(backend);
        }
        if let Ok(model) = dotenvy::var(MODEL_ENV_VAR) {
            update = update.model(model);
        }
        if let Ok(cache_path) = dotenvy::var(CACHE_ENV_VAR) {
            update = update.cache_path(cache_path);
        }
        let mut config = Self::default();
        config.configure(update);
        config
    }

    /// Merges `update` into this configuration and returns the result.
    ///
    /// Empty backend or model leave the current value. The cache path is
    /// always replaced, an empty one turns caching off. Extra options are
    /// merged key by key.
    pub fn configure(&mut self, update: SessionUpdate) -> &SessionConfig {
        let SessionUpdate {
            backend,
            model,
            cache_path,
            extra,
        } = update;
        if !backend.is_empty() {
            self.backend = backend;
        }
        if !model.is_empty() {
            self.model = model;
        }
        self.cache_path = if cache_path.is_empty() {
            None
        } else {
            Some(PathBuf::from(cache_path))
        };
        self.extra_options.extend(extra);
        crate::debug!(
            "Session configured: backend={} model={} cache={:?}",
            self.backend,
            self.model,
            self.cache_path
        );
        self
    }

    pub fn caching_enabled(&self) -> bool {
        self.cache_path.is_some()
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    /// The request sent for one row under this configuration.
    pub fn request(&self, prompt: &str, input: &str) -> GenerationRequest {
        GenerationRequest::new(prompt, input, &self.model).with_options(self.extra_options.clone())
    }
}

/// Partial update applied by [`SessionConfig::configure`].
///
/// Note that `cache_path` starts out as the default path, so an update that
/// never touches it re-enables the default cache.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionUpdate {
    pub backend: String,
    pub model: String,
    pub cache_path: String,
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for SessionUpdate {
    fn default() -> Self {
        Self {
            backend: String::new(),
            model: String::new(),
            cache_path: DEFAULT_CACHE_PATH.to_string(),
            extra: BTreeMap::new(),
        }
    }
}

impl SessionUpdate {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn backend<S: Into<String>>(mut self, backend: S) -> Self {
        self.backend = backend.into();
        self
    }

    pub fn model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    pub fn cache_path<S: Into<String>>(mut self, cache_path: S) -> Self {
        self.cache_path = cache_path.into();
        self
    }

    pub fn no_cache(self) -> Self {
        self.cache_path("")
    }

    /// Adds a backend specific setting, e.g. `options` or `keep_alive` for
    /// Ollama, `temperature` or `seed` for OpenAI.
    pub fn option<K: Into<String>, V: Into<serde_json::Value>>(mut self, key: K, value: V) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}
