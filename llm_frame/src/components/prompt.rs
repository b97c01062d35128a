//! Task prompts.
//!
//! Each task renders to a fixed instruction that ends where the row text
//! begins. The row text is appended as is; nothing stops a row from carrying
//! instructions of its own, and no attempt is made to neutralize them.

use super::labels::{ExtractLabels, Labels};
use crate::error::FrameError;

pub const DEFAULT_SENTIMENT_OPTIONS: [&str; 3] = ["positive", "negative", "neutral"];
pub const DEFAULT_MAX_WORDS: u32 = 10;

const BASED_ON_TEXT: &str = "The answer is based on the following text:";
const NO_CAPS: &str = "No capitalization. No explanations.";

/// One of the supported per-row operations and its parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Task {
    Sentiment {
        options: Labels,
        additional: String,
    },
    Summarize {
        max_words: u32,
        additional: String,
    },
    Translate {
        language: String,
        additional: String,
    },
    Classify {
        labels: Labels,
        additional: String,
    },
    Extract {
        labels: ExtractLabels,
        additional: String,
    },
    Custom {
        prompt: String,
        valid_responses: Option<Labels>,
    },
}

/// A rendered task: the instruction sent ahead of every row, and the
/// vocabulary responses are validated against.
#[derive(Clone, Debug, PartialEq)]
pub struct Prompt {
    pub text: String,
    pub valid_responses: Option<Labels>,
}

impl Task {
    pub fn sentiment<L: Into<Labels>, S: Into<String>>(options: L, additional: S) -> Self {
        Task::Sentiment {
            options: options.into(),
            additional: additional.into(),
        }
    }

    pub fn summarize<S: Into<String>>(max_words: u32, additional: S) -> Self {
        Task::Summarize {
            max_words,
            additional: additional.into(),
        }
    }

    pub fn translate<L: Into<String>, S: Into<String>>(language: L, additional: S) -> Self {
        Task::Translate {
            language: language.into(),
            additional: additional.into(),
        }
    }

    pub fn classify<L: Into<Labels>, S: Into<String>>(labels: L, additional: S) -> Self {
        Task::Classify {
            labels: labels.into(),
            additional: additional.into(),
        }
    }

    pub fn extract<L: Into<ExtractLabels>, S: Into<String>>(labels: L, additional: S) -> Self {
        Task::Extract {
            labels: labels.into(),
            additional: additional.into(),
        }
    }

    pub fn custom<P: Into<String>>(prompt: P, valid_responses: Option<Labels>) -> Self {
        Task::Custom {
            prompt: prompt.into(),
            valid_responses,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Task::Sentiment { .. } => "sentiment",
            Task::Summarize { .. } => "summarize",
            Task::Translate { .. } => "translate",
            Task::Classify { .. } => "classify",
            Task::Extract { .. } => "extract",
            Task::Custom { .. } => "custom",
        }
    }

    /// Conventional name of the output column.
    pub fn default_pred_name(&self) -> &'static str {
        match self {
            Task::Sentiment { .. } => "sentiment",
            Task::Summarize { .. } => "summary",
            Task::Translate { .. } => "translation",
            Task::Classify { .. } => "classify",
            Task::Extract { .. } => "extract",
            Task::Custom { .. } => "custom",
        }
    }

    /// Renders the prompt. Fails only on malformed parameters; never touches a
    /// backend.
    pub fn build(&self) -> Result<Prompt, FrameError> {
        match self {
            Task::Sentiment {
                options,
                additional,
            } => {
                options.check("sentiment options")?;
                Ok(Prompt {
                    text: sentence(&[
                        "You are a helpful sentiment engine.",
                        &format!(
                            "Return only one of the following answers: {}.",
                            options.quoted()
                        ),
                        NO_CAPS,
                        additional,
                        BASED_ON_TEXT,
                    ]),
                    valid_responses: Some(options.clone()),
                })
            }
            Task::Summarize {
                max_words,
                additional,
            } => {
                if *max_words == 0 {
                    return Err(FrameError::configuration(
                        "max_words must be greater than zero",
                    ));
                }
                Ok(Prompt {
                    text: sentence(&[
                        "You are a helpful summarization engine.",
                        "Your answer will contain no capitalization and no explanations.",
                        &format!("Return no more than {max_words} words."),
                        additional,
                        "The answer is the summary of the following text:",
                    ]),
                    valid_responses: None,
                })
            }
            Task::Translate {
                language,
                additional,
            } => {
                if language.trim().is_empty() {
                    return Err(FrameError::configuration(
                        "translate needs a target language",
                    ));
                }
                Ok(Prompt {
                    text: sentence(&[
                        "You are a helpful translation engine.",
                        "You will return only the translation text, no explanations.",
                        &format!(
                            "The target language to translate to is: {}.",
                            language.trim()
                        ),
                        additional,
                        "The answer is the translation of the following text:",
                    ]),
                    valid_responses: None,
                })
            }
            Task::Classify { labels, additional } => {
                labels.check("classify labels")?;
                Ok(Prompt {
                    text: sentence(&[
                        "You are a helpful classification engine.",
                        &format!(
                            "Determine if the text refers to one of the following: {}.",
                            labels.quoted()
                        ),
                        "Return only the matching label.",
                        NO_CAPS,
                        additional,
                        BASED_ON_TEXT,
                    ]),
                    valid_responses: Some(labels.clone()),
                })
            }
            Task::Extract { labels, additional } => {
                labels.check()?;
                Ok(Prompt {
                    text: extract_prompt(labels, additional),
                    valid_responses: None,
                })
            }
            Task::Custom {
                prompt,
                valid_responses,
            } => {
                if prompt.trim().is_empty() {
                    return Err(FrameError::configuration("custom prompt can not be empty"));
                }
                if let Some(valid) = valid_responses {
                    valid.check("valid responses")?;
                }
                Ok(Prompt {
                    text: prompt.clone(),
                    valid_responses: valid_responses.clone(),
                })
            }
        }
    }
}

fn extract_prompt(labels: &ExtractLabels, additional: &str) -> String {
    let fields: Vec<&str> = labels.fields().into_iter().map(str::trim).collect();
    match labels {
        ExtractLabels::Single(_) => sentence(&[
            "You are a helpful text extraction engine.",
            &format!("Extract the {} being referred to on the text.", fields[0]),
            "I expect 1 item exactly.",
            NO_CAPS,
            additional,
            BASED_ON_TEXT,
        ]),
        ExtractLabels::Many(_) => sentence(&[
            "You are a helpful text extraction engine.",
            &format!(
                "Extract the {} being referred to on the text.",
                fields.join(", ")
            ),
            &format!("I expect {} items exactly.", fields.len()),
            NO_CAPS,
            &format!(
                "Return the response exclusively in a pipe separated list, and no headers, in this order: {}.",
                fields.join("|")
            ),
            additional,
            BASED_ON_TEXT,
        ]),
    }
}

/// Joins the non-empty parts with single spaces.
fn sentence(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
