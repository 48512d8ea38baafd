pub mod config;
pub mod order;
pub mod state;
pub mod trial;
pub use config::RunnerConfig;
pub use order::{order_rng, shuffle_stimuli};
pub use state::{RunnerEvent, TrialRunner};
pub use trial::{Presentation, PresentationTimestamps};
