use lexdec_core::{Phase, Stimulus};
use lexdec_experiment::{RunnerConfig, RunnerEvent, TrialRunner};
use lexdec_render::View;
use lexdec_session::{SessionStore, Storage, Summary};
use lexdec_timing::Timer;
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

/// Screen flow of one participant session: instructions, task, results.
pub struct TaskSession<T: Timer, S: Storage> {
    phase: Phase,
    stimuli: Vec<Stimulus>,
    config: RunnerConfig,
    timer: T,
    runner: Option<TrialRunner<T, S>>,
    /// Parked here whenever no runner owns it.
    store: Option<SessionStore<S>>,
    /// When the last answer of a run was accepted.
    completed_at: Option<u64>,
    summary: Option<Summary>,
}

impl<T: Timer, S: Storage> TaskSession<T, S> {
    pub fn new(stimuli: Vec<Stimulus>, config: RunnerConfig, timer: T, store: SessionStore<S>) -> Self {
        Self {
            phase: Phase::default(),
            stimuli,
            config,
            timer,
            runner: None,
            store: Some(store),
            completed_at: None,
            summary: None,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    fn take_store(&mut self) -> Option<SessionStore<S>> {
        match self.runner.take() {
            Some(runner) => Some(runner.into_store()),
            None => self.store.take(),
        }
    }

    fn start_run(&mut self) {
        let Some(store) = self.take_store() else {
            error!("session store missing, cannot start a run");
            return;
        };
        self.completed_at = None;
        self.summary = None;
        self.runner = Some(TrialRunner::start(
            self.stimuli.clone(),
            self.config.clone(),
            self.timer.clone(),
            store,
        ));
        self.phase = Phase::Task;
    }

    /// Clears the stored run and starts over.
    fn restart(&mut self) {
        if let Some(mut store) = self.take_store() {
            if let Err(e) = store.clear() {
                warn!(error = %e, "could not clear previous session");
            }
            self.store = Some(store);
        }
        info!("restarting task");
        self.start_run();
    }

    fn show_results(&mut self) {
        let Some(runner) = &self.runner else {
            return;
        };
        // The run's own trials, even when the store kept an older record.
        let trials = runner.trials();
        self.summary = (!trials.is_empty()).then(|| Summary::from_trials(trials));
        if let Some(s) = &self.summary {
            info!(
                trials = s.trials,
                accuracy = s.accuracy,
                avg_rt_ms = s.avg_rt_ms,
                "results"
            );
        }
        self.phase = self.phase.next();
    }

    fn handle_runner_events(&mut self, events: Vec<RunnerEvent>) {
        for event in events {
            match event {
                RunnerEvent::TrialAccepted { index, trial } => {
                    debug!(index, correct = trial.correct, rt_ms = trial.rt_ms, "answer");
                }
                RunnerEvent::StimulusPresented { index } => {
                    trace!(index, "next stimulus");
                }
                RunnerEvent::RunCompleted { persisted } => {
                    if !persisted {
                        warn!("results are only available until the window closes");
                    }
                    self.completed_at = Some(self.timer.now());
                }
            }
        }
    }

    /// Button channel.
    pub fn submit(&mut self, answer: bool) {
        if !self.phase.allows_answers() {
            return;
        }
        let events = match self.runner.as_mut() {
            Some(runner) => runner.submit(answer),
            None => return,
        };
        self.handle_runner_events(events);
    }

    /// Starts the task from the instructions screen.
    pub fn press_space(&mut self) {
        if self.phase == Phase::Instructions {
            self.start_run();
        }
    }

    /// Keyboard channel: answer aliases, and R to restart from results.
    pub fn press_char(&mut self, ch: char) {
        if self.phase.is_results() && ch.eq_ignore_ascii_case(&'r') {
            self.restart();
        } else if let Some(answer) = self.config.keys().answer_for(ch) {
            self.submit(answer);
        }
    }

    /// Called once per frame.
    pub fn update(&mut self) {
        if !self.phase.is_task() {
            return;
        }
        let events = self
            .runner
            .as_mut()
            .map(|runner| runner.update())
            .unwrap_or_default();
        self.handle_runner_events(events);

        // Keep the last answer's feedback on screen before switching.
        let delay = Duration::from_millis(self.config.feedback_delay_ms);
        if let Some(at) = self.completed_at {
            if self.timer.elapsed(at) >= delay {
                self.show_results();
            }
        } else if self.runner.as_ref().is_some_and(|r| r.is_done()) {
            // Empty stimulus list: nothing was ever presented.
            self.show_results();
        }
    }

    pub fn view(&self, hover: Option<bool>) -> View<'_> {
        match (self.phase, &self.runner) {
            (Phase::Instructions, _) => View::Instructions {
                trials: self.stimuli.len(),
            },
            (Phase::Task, Some(runner)) => {
                let total = runner.stimuli().len();
                View::Task {
                    stimulus: runner
                        .current_stimulus()
                        .or_else(|| runner.stimuli().last())
                        .map(|s| s.text.as_str()),
                    progress: runner.progress().unwrap_or((total, total)),
                    accepting: runner.is_accepting(),
                    hover,
                }
            }
            (Phase::Task, None) | (Phase::Results, _) => View::Results {
                summary: self.summary,
            },
        }
    }
}
