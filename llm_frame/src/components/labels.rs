use crate::error::FrameError;
use serde::{Deserialize, Serialize};

/// A constrained vocabulary: either a plain list of accepted answers, or a
/// mapping from accepted answer to the value written to the output column.
///
/// Used for sentiment options, classification labels and the valid responses
/// of a custom prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Labels {
    Sequence(Vec<String>),
    Mapping(Vec<(String, String)>),
}

impl Labels {
    pub fn sequence<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Labels::Sequence(labels.into_iter().map(Into::into).collect())
    }

    pub fn mapping<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Labels::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The answers the model is asked to choose from. For a mapping these are
    /// its keys.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Labels::Sequence(labels) => labels.iter().map(String::as_str).collect(),
            Labels::Mapping(pairs) => pairs.iter().map(|(k, _)| k.as_str()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Labels::Sequence(labels) => labels.len(),
            Labels::Mapping(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rejects empty vocabularies, blank entries and entries that only differ
    /// by case, since those can not be told apart when validating.
    pub(crate) fn check(&self, what: &str) -> Result<(), FrameError> {
        if self.is_empty() {
            return Err(FrameError::configuration(format!("{what} can not be empty")));
        }
        let mut seen: Vec<String> = Vec::with_capacity(self.len());
        for key in self.keys() {
            let folded = key.trim().to_lowercase();
            if folded.is_empty() {
                return Err(FrameError::configuration(format!(
                    "{what} can not contain blank entries"
                )));
            }
            if seen.contains(&folded) {
                return Err(FrameError::configuration(format!(
                    "{what} contain {key:?} more than once"
                )));
            }
            seen.push(folded);
        }
        Ok(())
    }

    /// `'a', 'b', 'c'`
    pub(crate) fn quoted(&self) -> String {
        self.keys()
            .iter()
            .map(|k| format!("'{}'", k.trim()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<Vec<String>> for Labels {
    fn from(labels: Vec<String>) -> Self {
        Labels::Sequence(labels)
    }
}

impl From<Vec<&str>> for Labels {
    fn from(labels: Vec<&str>) -> Self {
        Labels::sequence(labels)
    }
}

impl<const N: usize> From<[&str; N]> for Labels {
    fn from(labels: [&str; N]) -> Self {
        Labels::sequence(labels)
    }
}

impl From<Vec<(String, String)>> for Labels {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Labels::Mapping(pairs)
    }
}

impl From<Vec<(&str, &str)>> for Labels {
    fn from(pairs: Vec<(&str, &str)>) -> Self {
        Labels::mapping(pairs)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Labels {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Labels::mapping(pairs)
    }
}

/// What an extraction pulls out of the text: one field, or several returned
/// pipe separated in label order.
///
/// With a mapping, the keys are the fields to extract and the values name the
/// columns they land in when the result is expanded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractLabels {
    Single(String),
    Many(Labels),
}

impl ExtractLabels {
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ExtractLabels::Single(label) => vec![label.as_str()],
            ExtractLabels::Many(labels) => labels.keys(),
        }
    }

    /// Output column names used when the result is split into one column per field.
    pub fn column_names(&self) -> Vec<&str> {
        match self {
            ExtractLabels::Single(label) => vec![label.as_str()],
            ExtractLabels::Many(Labels::Sequence(labels)) => {
                labels.iter().map(String::as_str).collect()
            }
            ExtractLabels::Many(Labels::Mapping(pairs)) => {
                pairs.iter().map(|(_, v)| v.as_str()).collect()
            }
        }
    }

    pub(crate) fn check(&self) -> Result<(), FrameError> {
        match self {
            ExtractLabels::Single(label) if label.trim().is_empty() => Err(
                FrameError::configuration("extract labels can not be empty"),
            ),
            ExtractLabels::Single(_) => Ok(()),
            ExtractLabels::Many(labels) => labels.check("extract labels"),
        }
    }
}

impl From<&str> for ExtractLabels {
    fn from(label: &str) -> Self {
        ExtractLabels::Single(label.to_string())
    }
}

impl From<String> for ExtractLabels {
    fn from(label: String) -> Self {
        ExtractLabels::Single(label)
    }
}

impl From<Labels> for ExtractLabels {
    fn from(labels: Labels) -> Self {
        ExtractLabels::Many(labels)
    }
}

impl From<Vec<&str>> for ExtractLabels {
    fn from(labels: Vec<&str>) -> Self {
        ExtractLabels::Many(labels.into())
    }
}

impl<const N: usize> From<[&str; N]> for ExtractLabels {
    fn from(labels: [&str; N]) -> Self {
        ExtractLabels::Many(labels.into())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for ExtractLabels {
    fn from(pairs: [(&str, &str); N]) -> Self {
        ExtractLabels::Many(pairs.into())
    }
}
