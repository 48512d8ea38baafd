use super::config::RunnerConfig;
use super::trial::Presentation;
use lexdec_core::{RunState, Stimulus, Trial};
use lexdec_session::{SessionStore, Storage};
use lexdec_timing::{Timer, round_to_ms};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerEvent {
    TrialAccepted { index: usize, trial: Trial },
    StimulusPresented { index: usize },
    /// `persisted` is false when the session store rejected the write.
    RunCompleted { persisted: bool },
}

/// Presents stimuli one at a time and records exactly one answer for each.
pub struct TrialRunner<T, S>
where
    T: Timer,
    S: Storage,
{
    pub config: RunnerConfig,
    timer: T,
    store: SessionStore<S>,
    stimuli: Vec<Stimulus>,
    trials: Vec<Trial>,
    state: RunState,
    current: Option<Presentation>,
}

impl<T, S> TrialRunner<T, S>
where
    T: Timer,
    S: Storage,
{
    /// Starts a run at the first stimulus. An empty list starts, and stays, `Done`.
    pub fn start(
        stimuli: Vec<Stimulus>,
        config: RunnerConfig,
        timer: T,
        store: SessionStore<S>,
    ) -> Self {
        let mut runner = Self {
            config,
            timer,
            store,
            trials: Vec::with_capacity(stimuli.len()),
            stimuli,
            state: RunState::Done,
            current: None,
        };

        if runner.stimuli.is_empty() {
            info!("empty stimulus list, nothing to present");
        } else {
            info!(stimuli = runner.stimuli.len(), "run started");
            runner.present(0);
        }
        runner
    }

    fn present(&mut self, index: usize) {
        let now = self.timer.now();
        self.state = RunState::Presenting(index);
        self.current = Some(Presentation::new(index, now));
        debug!(index, text = %self.stimuli[index].text, "stimulus presented");
    }

    /// Records `answer` for the stimulus on screen. Ignored once the current
    /// stimulus already has an answer, and after the run is done.
    pub fn submit(&mut self, answer: bool) -> Vec<RunnerEvent> {
        let mut events = Vec::new();

        let Some(current) = self.current.as_mut() else {
            trace!(answer, "submission after run completed ignored");
            return events;
        };
        if current.is_answered() {
            trace!(index = current.index, answer, "duplicate submission ignored");
            return events;
        }

        let now = self.timer.now();
        current.timestamps.accepted = Some(now);
        let index = current.index;
        let rt_ms = round_to_ms(now.saturating_sub(current.timestamps.shown));

        let trial = Trial::new(&self.stimuli[index], answer, rt_ms);
        debug!(
            index,
            item = %trial.item,
            answer,
            correct = trial.correct,
            rt_ms,
            "trial recorded"
        );
        self.trials.push(trial.clone());
        events.push(RunnerEvent::TrialAccepted { index, trial });

        if index + 1 == self.stimuli.len() {
            events.push(self.finish());
        } else if self.config.feedback_delay_ms == 0 {
            self.present(index + 1);
            events.push(RunnerEvent::StimulusPresented { index: index + 1 });
        }

        events
    }

    /// Maps a key alias to an answer. Other keys are ignored.
    pub fn submit_key(&mut self, key: char) -> Vec<RunnerEvent> {
        match self.config.keys().answer_for(key) {
            Some(answer) => self.submit(answer),
            None => {
                trace!(?key, "key is not an answer alias");
                Vec::new()
            }
        }
    }

    /// Advances to the next stimulus once the feedback delay has passed.
    pub fn update(&mut self) -> Vec<RunnerEvent> {
        let mut events = Vec::new();
        let Some(accepted) = self
            .current
            .as_ref()
            .and_then(|c| c.timestamps.accepted.map(|at| (c.index, at)))
        else {
            return events;
        };
        let (index, accepted_at) = accepted;

        let delay = Duration::from_millis(self.config.feedback_delay_ms);
        if self.timer.elapsed(accepted_at) >= delay {
            self.present(index + 1);
            events.push(RunnerEvent::StimulusPresented { index: index + 1 });
        }
        events
    }

    fn finish(&mut self) -> RunnerEvent {
        self.current = None;
        self.state = RunState::Done;

        let persisted = match self.store.save(&self.trials) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "could not persist session, keeping trials in memory");
                false
            }
        };
        let correct = self.trials.iter().filter(|t| t.correct).count();
        info!(trials = self.trials.len(), correct, persisted, "run completed");
        RunnerEvent::RunCompleted { persisted }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    /// True while the stimulus on screen is still waiting for its answer.
    pub fn is_accepting(&self) -> bool {
        self.current.as_ref().is_some_and(|c| !c.is_answered())
    }

    pub fn current_stimulus(&self) -> Option<&Stimulus> {
        self.current.as_ref().map(|c| &self.stimuli[c.index])
    }

    /// 1-based position of the stimulus on screen and the run length.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.state
            .index()
            .map(|i| (i + 1, self.stimuli.len()))
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn stimuli(&self) -> &[Stimulus] {
        &self.stimuli
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore<S> {
        &mut self.store
    }

    /// Gives the store back, e.g. to start the next run with it.
    pub fn into_store(self) -> SessionStore<S> {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexdec_session::{MemoryStorage, StorageError};
    use lexdec_timing::ManualTimer;

    fn two_stimuli() -> Vec<Stimulus> {
        vec![Stimulus::nonword("brint"), Stimulus::word("garden")]
    }

    fn runner(
        stimuli: Vec<Stimulus>,
        delay_ms: u64,
    ) -> (TrialRunner<ManualTimer, MemoryStorage>, ManualTimer) {
        let timer = ManualTimer::new();
        let runner = TrialRunner::start(
            stimuli,
            RunnerConfig::default().with_feedback_delay_ms(delay_ms),
            timer.clone(),
            SessionStore::new(MemoryStorage::new()),
        );
        (runner, timer)
    }

    #[derive(Debug, Default)]
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
    }

    #[test]
    fn starts_presenting_first_stimulus() {
        let (r, _) = runner(two_stimuli(), 0);
        assert_eq!(r.state(), RunState::Presenting(0));
        assert_eq!(r.current_stimulus(), Some(&Stimulus::nonword("brint")));
        assert_eq!(r.progress(), Some((1, 2)));
        assert!(r.is_accepting());
        assert!(r.trials().is_empty());
    }

    #[test]
    fn two_stimulus_run_end_to_end() {
        let (mut r, timer) = runner(two_stimuli(), 0);

        timer.advance_ms(640);
        let events = r.submit(false);
        assert_eq!(
            events,
            vec![
                RunnerEvent::TrialAccepted {
                    index: 0,
                    trial: Trial::new(&Stimulus::nonword("brint"), false, 640),
                },
                RunnerEvent::StimulusPresented { index: 1 },
            ]
        );
        assert_eq!(r.state(), RunState::Presenting(1));

        timer.advance_ms(480);
        let events = r.submit(true);
        assert_eq!(events.last(), Some(&RunnerEvent::RunCompleted { persisted: true }));
        assert_eq!(r.state(), RunState::Done);
        assert_eq!(r.current_stimulus(), None);
        assert_eq!(r.progress(), None);

        let correct: Vec<bool> = r.trials().iter().map(|t| t.correct).collect();
        assert_eq!(correct, vec![true, true]);
        assert_eq!(r.trials()[1].rt_ms, 480);
        assert_eq!(r.store().load().as_deref(), Some(r.trials()));
    }

    #[test]
    fn duplicate_submission_records_one_trial() {
        let (mut r, timer) = runner(two_stimuli(), 300);
        timer.advance_ms(500);
        assert_eq!(r.submit(true).len(), 1);
        assert!(!r.is_accepting());
        assert!(r.submit(true).is_empty());
        assert!(r.submit(false).is_empty());
        assert!(r.submit_key('a').is_empty());
        assert_eq!(r.trials().len(), 1);
        assert!(r.trials()[0].answer);
    }

    #[test]
    fn next_stimulus_waits_for_feedback_delay() {
        let (mut r, timer) = runner(two_stimuli(), 300);
        timer.advance_ms(100);
        r.submit(false);

        timer.advance_ms(299);
        assert!(r.update().is_empty());
        assert_eq!(r.state(), RunState::Presenting(0));

        timer.advance_ms(1);
        assert_eq!(r.update(), vec![RunnerEvent::StimulusPresented { index: 1 }]);
        assert_eq!(r.state(), RunState::Presenting(1));
        assert!(r.is_accepting());
        assert!(r.update().is_empty());
    }

    #[test]
    fn timer_restarts_for_each_stimulus() {
        let (mut r, timer) = runner(two_stimuli(), 300);
        timer.advance_ms(700);
        r.submit(false);
        timer.advance_ms(300);
        r.update();
        timer.advance_ms(250);
        r.submit(true);
        let rts: Vec<u64> = r.trials().iter().map(|t| t.rt_ms).collect();
        assert_eq!(rts, vec![700, 250]);
    }

    #[test]
    fn rt_is_rounded_to_nearest_ms() {
        let (mut r, timer) = runner(two_stimuli(), 0);
        timer.advance(Duration::from_micros(512_500));
        r.submit(false);
        timer.advance(Duration::from_micros(99_499));
        r.submit(true);
        assert_eq!(r.trials()[0].rt_ms, 513);
        assert_eq!(r.trials()[1].rt_ms, 99);
    }

    #[test]
    fn order_follows_presentation_not_timing() {
        let stimuli = vec![
            Stimulus::word("river"),
            Stimulus::nonword("stabe"),
            Stimulus::word("token"),
        ];
        let (mut r, timer) = runner(stimuli.clone(), 0);
        for (ms, answer) in [(900, true), (120, true), (450, false)] {
            timer.advance_ms(ms);
            r.submit(answer);
        }
        let items: Vec<&str> = r.trials().iter().map(|t| t.item.as_str()).collect();
        assert_eq!(items, vec!["river", "stabe", "token"]);
        let correct: Vec<bool> = r.trials().iter().map(|t| t.correct).collect();
        assert_eq!(correct, vec![true, false, false]);
    }

    #[test]
    fn key_aliases_drive_submit() {
        let (mut r, _) = runner(two_stimuli(), 0);
        assert!(r.submit_key('x').is_empty());
        r.submit_key('L');
        r.submit_key('a');
        let answers: Vec<bool> = r.trials().iter().map(|t| t.answer).collect();
        assert_eq!(answers, vec![false, true]);
        assert!(r.is_done());
    }

    #[test]
    fn submissions_after_done_are_ignored() {
        let (mut r, _) = runner(vec![Stimulus::word("planet")], 0);
        r.submit(true);
        assert!(r.is_done());
        assert!(r.submit(false).is_empty());
        assert!(r.update().is_empty());
        assert_eq!(r.trials().len(), 1);
    }

    #[test]
    fn last_stimulus_finishes_without_waiting() {
        let (mut r, _) = runner(vec![Stimulus::word("planet")], 300);
        let events = r.submit(true);
        assert_eq!(events.len(), 2);
        assert!(r.is_done());
        assert!(r.store().load().is_some());
    }

    #[test]
    fn empty_list_is_done_and_saves_nothing() {
        let (mut r, _) = runner(Vec::new(), 0);
        assert!(r.is_done());
        assert_eq!(r.current_stimulus(), None);
        assert!(r.submit(true).is_empty());
        assert_eq!(r.store().load(), None);
    }

    #[test]
    fn failed_save_still_completes_the_run() {
        let mut r = TrialRunner::start(
            two_stimuli(),
            RunnerConfig::default().with_feedback_delay_ms(0),
            ManualTimer::new(),
            SessionStore::new(BrokenStorage),
        );
        r.submit(false);
        let events = r.submit(true);
        assert_eq!(events.last(), Some(&RunnerEvent::RunCompleted { persisted: false }));
        assert!(r.is_done());
        assert_eq!(r.trials().len(), 2);
        assert_eq!(r.store().load(), None);
    }

    #[test]
    fn store_survives_into_next_run() {
        let (mut r, _) = runner(two_stimuli(), 0);
        r.submit(false);
        r.submit(true);
        let store = r.into_store();
        assert_eq!(store.load().map(|t| t.len()), Some(2));
    }
}
