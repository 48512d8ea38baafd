pub mod error;
pub mod keys;
pub mod phase;
pub mod stimulus;
pub mod trial;

pub use error::WordListError;
pub use keys::AnswerKeys;
pub use phase::Phase;
pub use stimulus::{default_word_list, load_word_list, parse_word_list, Stimulus};
pub use trial::{RunState, Trial};
