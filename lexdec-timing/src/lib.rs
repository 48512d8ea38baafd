pub mod timer;

pub use timer::{FrameTimingStats, HighPrecisionTimer, ManualTimer, Timer, round_to_ms};
