use lexdec_core::AnswerKeys;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Pause between an accepted answer and the next stimulus. Zero advances
    /// inside `submit`.
    pub feedback_delay_ms: u64,
    pub word_key: char,
    pub nonword_key: char,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        let keys = AnswerKeys::default();
        Self {
            feedback_delay_ms: 300,
            word_key: keys.word,
            nonword_key: keys.nonword,
        }
    }
}

impl RunnerConfig {
    pub fn keys(&self) -> AnswerKeys {
        AnswerKeys {
            word: self.word_key,
            nonword: self.nonword_key,
        }
    }

    pub fn with_feedback_delay_ms(mut self, ms: u64) -> Self {
        self.feedback_delay_ms = ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RunnerConfig::default();
        assert_eq!(config.feedback_delay_ms, 300);
        assert_eq!(config.keys(), AnswerKeys::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: RunnerConfig = toml::from_str("feedback_delay_ms = 200").unwrap();
        assert_eq!(config.feedback_delay_ms, 200);
        assert_eq!(config.word_key, 'a');

        let config: RunnerConfig = toml::from_str("word_key = \"f\"\nnonword_key = \"j\"").unwrap();
        assert_eq!(config.feedback_delay_ms, 300);
        assert_eq!(config.keys().answer_for('J'), Some(false));
    }
}
