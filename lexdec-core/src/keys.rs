use serde::{Deserialize, Serialize};

/// The two keyboard aliases for "real word" and "not a word".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerKeys {
    pub word: char,
    pub nonword: char,
}

impl Default for AnswerKeys {
    fn default() -> Self {
        Self {
            word: 'a',
            nonword: 'l',
        }
    }
}

impl AnswerKeys {
    /// Maps a pressed key to an answer, ignoring case. `None` for any other key.
    pub fn answer_for(&self, key: char) -> Option<bool> {
        if key.eq_ignore_ascii_case(&self.word) {
            Some(true)
        } else if key.eq_ignore_ascii_case(&self.nonword) {
            Some(false)
        } else {
            None
        }
    }

    pub fn label(&self, answer: bool) -> char {
        let key = if answer { self.word } else { self.nonword };
        key.to_ascii_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_aliases_ignore_case() {
        let keys = AnswerKeys::default();
        assert_eq!(keys.answer_for('a'), Some(true));
        assert_eq!(keys.answer_for('A'), Some(true));
        assert_eq!(keys.answer_for('l'), Some(false));
        assert_eq!(keys.answer_for('L'), Some(false));
        assert_eq!(keys.answer_for('x'), None);
        assert_eq!(keys.answer_for(' '), None);
    }

    #[test]
    fn custom_aliases() {
        let keys = AnswerKeys {
            word: 'f',
            nonword: 'j',
        };
        assert_eq!(keys.answer_for('F'), Some(true));
        assert_eq!(keys.answer_for('j'), Some(false));
        assert_eq!(keys.answer_for('a'), None);
        assert_eq!(keys.label(true), 'F');
        assert_eq!(keys.label(false), 'J');
    }
}
