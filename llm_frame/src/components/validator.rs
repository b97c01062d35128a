use super::labels::Labels;

/// Normalizes a raw backend response against the task's vocabulary.
///
/// Without a vocabulary the trimmed text is kept as is. With one, the trimmed
/// text must equal an accepted answer ignoring case; the canonical spelling
/// (or the mapped value) is returned, anything else becomes a missing value.
pub fn validate(raw: &str, valid: Option<&Labels>) -> Option<String> {
    let answer = raw.trim();
    let Some(valid) = valid else {
        return Some(answer.to_string());
    };
    let folded = answer.to_lowercase();
    match valid {
        Labels::Sequence(labels) => labels
            .iter()
            .find(|label| label.trim().to_lowercase() == folded)
            .map(|label| label.trim().to_string()),
        Labels::Mapping(pairs) => pairs
            .iter()
            .find(|(key, _)| key.trim().to_lowercase() == folded)
            .map(|(_, value)| value.clone()),
    }
}
