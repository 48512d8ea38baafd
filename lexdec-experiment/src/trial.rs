/// The stimulus currently on screen and when things happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub index: usize,
    pub timestamps: PresentationTimestamps,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationTimestamps {
    pub shown: u64,
    pub accepted: Option<u64>,
}

impl Presentation {
    pub fn new(index: usize, shown: u64) -> Self {
        Self {
            index,
            timestamps: PresentationTimestamps {
                shown,
                accepted: None,
            },
        }
    }

    pub fn is_answered(&self) -> bool {
        self.timestamps.accepted.is_some()
    }
}
