use llm_generate::GenerationRequest;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

/// Content address of one generation: SHA-256 over the backend name, model,
/// extra options, prompt text and row text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(backend: &str, request: &GenerationRequest) -> Self {
        let mut hasher = Sha256::new();
        // Length prefixes keep field boundaries unambiguous.
        let mut field = |bytes: &[u8]| {
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        };
        field(backend.as_bytes());
        field(request.model.as_bytes());
        field((request.options.len() as u64).to_le_bytes().as_slice());
        for (key, value) in &request.options {
            field(key.as_bytes());
            field(value.to_string().as_bytes());
        }
        field(request.prompt.as_bytes());
        field(request.input.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedRequest {
    backend: String,
    #[serde(flatten)]
    request: GenerationRequest,
}

/// On disk form of one cache entry.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    request: CachedRequest,
    response: String,
}

/// Directory of immutable response records, one JSON file per key, sharded by
/// the first two hex characters of the key.
///
/// A store opened without a directory misses every lookup and drops every
/// write. The first I/O or decode error turns the store into that same
/// pass-through for the rest of its life.
#[derive(Debug)]
pub struct CacheStore {
    root: Option<PathBuf>,
    disabled: AtomicBool,
}

impl CacheStore {
    pub fn open(root: Option<&Path>) -> Self {
        Self {
            root: root.map(Path::to_path_buf),
            disabled: AtomicBool::new(false),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.root.is_some() && !self.disabled.load(Ordering::Relaxed)
    }

    pub async fn lookup(&self, key: &CacheKey) -> Option<String> {
        let path = record_path(self.active_root()?, key);
        match blocking(move || read_record(&path)).await {
            Ok(Some(record)) => {
                crate::trace!("Cache hit {key}");
                Some(record.response)
            }
            Ok(None) => None,
            Err(e) => {
                self.disable(&e);
                None
            }
        }
    }

    pub async fn store(
        &self,
        key: &CacheKey,
        backend: &str,
        request: &GenerationRequest,
        response: &str,
    ) {
        let Some(root) = self.active_root() else {
            return;
        };
        let path = record_path(root, key);
        let record = CacheRecord {
            request: CachedRequest {
                backend: backend.to_string(),
                request: request.clone(),
            },
            response: response.to_string(),
        };
        if let Err(e) = blocking(move || write_record(&path, &record)).await {
            self.disable(&e);
        }
    }

    fn active_root(&self) -> Option<&Path> {
        if self.disabled.load(Ordering::Relaxed) {
            return None;
        }
        self.root.as_deref()
    }

    fn disable(&self, e: &anyhow::Error) {
        if !self.disabled.swap(true, Ordering::Relaxed) {
            crate::warn!("Cache disabled for this call: {e:#}");
        }
    }
}

/// Runs file I/O on tokio's blocking pool so concurrent jobs keep the
/// executor free.
async fn blocking<T, F>(f: F) -> crate::Result<T>
where
    F: FnOnce() -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| crate::anyhow!("cache task failed: {e}"))?
}

fn record_path(root: &Path, key: &CacheKey) -> PathBuf {
    let key = key.as_str();
    root.join(&key[..2]).join(format!("{key}.json"))
}

fn read_record(path: &Path) -> crate::Result<Option<CacheRecord>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(anyhow::Error::new(e).context(format!("reading {}", path.display())))
        }
    };
    let record = serde_json::from_slice(&bytes)
        .map_err(|e| crate::anyhow!("decoding {}: {e}", path.display()))?;
    Ok(Some(record))
}

fn write_record(path: &Path, record: &CacheRecord) -> crate::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| crate::anyhow!("cache record {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut file, record)?;
    file.flush()?;
    // Racing writers for one key hold identical records; last rename wins.
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
