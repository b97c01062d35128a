use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One generation call: the rendered task prompt, the row text it is applied
/// to, and the model settings forwarded to the backend.
///
/// `options` is a sorted map so that the serialized form, and anything hashed
/// from it, does not depend on the order options were set in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub input: String,
    #[serde(default)]
    pub options: BTreeMap<String, serde_json::Value>,
}

impl GenerationRequest {
    pub fn new<P, I, M>(prompt: P, input: I, model: M) -> Self
    where
        P: Into<String>,
        I: Into<String>,
        M: Into<String>,
    {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            input: input.into(),
            options: BTreeMap::new(),
        }
    }

    pub fn with_options(mut self, options: BTreeMap<String, serde_json::Value>) -> Self {
        self.options = options;
        self
    }

    pub fn with_option<K: Into<String>, V: Into<serde_json::Value>>(
        mut self,
        key: K,
        value: V,
    ) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// The single user message sent to the backend. The row text follows the
    /// prompt on its own line and is not escaped.
    pub fn content(&self) -> String {
        format!("{}\n{}", self.prompt, self.input)
    }

    /// Copies the extra options into a backend's JSON body. Keys the backend
    /// sets itself are skipped.
    pub(crate) fn merge_options(
        &self,
        body: &mut serde_json::Map<String, serde_json::Value>,
        reserved: &[&str],
    ) {
        for (key, value) in &self.options {
            if reserved.contains(&key.as_str()) {
                crate::warn!("Ignoring option {key:?}: it is set by the backend");
                continue;
            }
            body.insert(key.clone(), value.clone());
        }
    }
}

impl std::fmt::Display for GenerationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "GenerationRequest:")?;
        writeln!(f, "  model: {}", self.model)?;
        writeln!(f, "  options: {:?}", self.options)?;
        write!(f, "  content: {:?}", self.content())
    }
}
