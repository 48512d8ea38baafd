use crate::stimulus::Stimulus;
use serde::{Deserialize, Serialize};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Showing the stimulus at this index.
    Presenting(usize),
    Done,
}

impl RunState {
    pub fn index(&self) -> Option<usize> {
        match self {
            RunState::Presenting(i) => Some(*i),
            RunState::Done => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, RunState::Done)
    }
}

/// Recorded result per trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    pub item: String,
    pub is_word: bool,
    pub answer: bool,
    pub correct: bool,
    pub rt_ms: u64,
}

impl Trial {
    pub fn new(stimulus: &Stimulus, answer: bool, rt_ms: u64) -> Self {
        Self {
            item: stimulus.text.clone(),
            is_word: stimulus.is_word,
            answer,
            correct: answer == stimulus.is_word,
            rt_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correctness_is_derived_from_answer() {
        let nonword = Stimulus::nonword("brint");
        assert!(Trial::new(&nonword, false, 420).correct);
        assert!(!Trial::new(&nonword, true, 420).correct);

        let word = Stimulus::word("garden");
        assert!(Trial::new(&word, true, 0).correct);
        assert!(!Trial::new(&word, false, 0).correct);
    }

    #[test]
    fn serializes_with_session_field_names() {
        let trial = Trial::new(&Stimulus::word("river"), true, 512);
        let json = serde_json::to_value(&trial).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "item": "river",
                "isWord": true,
                "answer": true,
                "correct": true,
                "rtMs": 512
            })
        );
    }

    #[test]
    fn run_state_index() {
        assert_eq!(RunState::Presenting(3).index(), Some(3));
        assert_eq!(RunState::Done.index(), None);
        assert!(RunState::Done.is_done());
    }
}
