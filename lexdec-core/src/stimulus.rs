use crate::error::WordListError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A letter string shown to the participant, labelled with whether it is a real word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stimulus {
    pub text: String,
    pub is_word: bool,
}

impl Stimulus {
    pub fn new(text: impl Into<String>, is_word: bool) -> Self {
        Self {
            text: text.into(),
            is_word,
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    pub fn nonword(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }
}

/// Built-in ten item list, real words interleaved with pronounceable non-words.
pub fn default_word_list() -> Vec<Stimulus> {
    [
        ("brint", false),
        ("garden", true),
        ("mave", false),
        ("token", true),
        ("flirp", false),
        ("plint", false),
        ("river", true),
        ("stabe", false),
        ("nurch", false),
        ("planet", true),
    ]
    .into_iter()
    .map(|(text, is_word)| Stimulus::new(text, is_word))
    .collect()
}

/// Parses a JSON array of `{ "text": .., "isWord": .. }` objects.
pub fn parse_word_list(json: &str) -> Result<Vec<Stimulus>, WordListError> {
    let list: Vec<Stimulus> = serde_json::from_str(json)?;
    if list.is_empty() {
        return Err(WordListError::Empty);
    }
    if let Some(index) = list.iter().position(|s| s.text.trim().is_empty()) {
        return Err(WordListError::BlankEntry { index });
    }
    Ok(list)
}

pub fn load_word_list(path: impl AsRef<Path>) -> Result<Vec<Stimulus>, WordListError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| WordListError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_word_list(&raw)
}
