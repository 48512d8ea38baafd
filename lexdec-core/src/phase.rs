/// Screens of a session, in the order a participant sees them.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Instructions,
    Task,
    Results,
}

impl Phase {
    /// Whether answer keys and buttons are live in this phase.
    pub fn allows_answers(&self) -> bool {
        matches!(self, Phase::Task)
    }

    /// Results loops back to a fresh task on restart.
    pub fn next(&self) -> Phase {
        use Phase::*;
        match self {
            Instructions => Task,
            Task => Results,
            Results => Task,
        }
    }

    pub fn is_task(&self) -> bool {
        matches!(self, Phase::Task)
    }

    pub fn is_results(&self) -> bool {
        matches!(self, Phase::Results)
    }
}
