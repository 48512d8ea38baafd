use lexdec_core::Trial;

/// Integer division rounding halves up. `den` must be non-zero.
fn div_round_half_up(num: u64, den: u64) -> u64 {
    (num * 2 + den) / (den * 2)
}

/// Percentage of correct trials, rounded to the nearest integer. 0 when empty.
pub fn compute_accuracy(trials: &[Trial]) -> u32 {
    if trials.is_empty() {
        return 0;
    }
    let correct = trials.iter().filter(|t| t.correct).count() as u64;
    div_round_half_up(correct * 100, trials.len() as u64) as u32
}

/// Mean response time in milliseconds, rounded to the nearest integer. 0 when empty.
pub fn compute_avg_rt(trials: &[Trial]) -> u64 {
    if trials.is_empty() {
        return 0;
    }
    let sum: u64 = trials.iter().map(|t| t.rt_ms).sum();
    div_round_half_up(sum, trials.len() as u64)
}

/// What the results views display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub trials: usize,
    pub correct: usize,
    pub accuracy: u32,
    pub avg_rt_ms: u64,
}

impl Summary {
    pub fn from_trials(trials: &[Trial]) -> Self {
        Self {
            trials: trials.len(),
            correct: trials.iter().filter(|t| t.correct).count(),
            accuracy: compute_accuracy(trials),
            avg_rt_ms: compute_avg_rt(trials),
        }
    }
}
