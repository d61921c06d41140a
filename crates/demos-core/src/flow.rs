//! Demo flow controller.
//!
//! [`DemoFlow`] owns everything the pure [`transition`] function must not
//! touch: the case table, the clock and the random generator. Each user action
//! is turned into an [`Event`] carrying the shuffled sequence or the current
//! time, and the resulting session replaces the old one.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::aggregate::Summary;
use crate::case::{Case, Diagnosis};
use crate::clock::Clock;
use crate::config::Config;
use crate::error::Result;
use crate::session::{Confidence, Session, Stage};
use crate::transition::{transition, Event, Outcome};

/// Drives one session at a time through the demo.
#[derive(Debug)]
pub struct DemoFlow {
    cases: Vec<Case>,
    seed: Option<u64>,
    rng: StdRng,
    clock: Clock,
    session: Session,
}

impl DemoFlow {
    /// Creates a controller over `cases` with an OS-seeded shuffle.
    #[must_use]
    pub fn new(cases: Vec<Case>) -> Self {
        Self {
            cases,
            seed: None,
            rng: StdRng::from_os_rng(),
            clock: Clock::default(),
            session: Session::default(),
        }
    }

    /// Creates a controller whose shuffles are reproducible from `seed`.
    ///
    /// Successive runs still differ from each other; the whole series of
    /// sequences is what repeats.
    #[must_use]
    pub fn with_seed(cases: Vec<Case>, seed: u64) -> Self {
        Self {
            cases,
            seed: Some(seed),
            rng: StdRng::seed_from_u64(seed),
            clock: Clock::default(),
            session: Session::default(),
        }
    }

    /// Creates a controller from a validated configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(config.cases.clone(), seed),
            None => Self::new(config.cases.clone()),
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The case table, in its original order.
    #[must_use]
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Seed of the shuffle, if one was given.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// The current session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access to the clock, for advancing a fixed clock in tests.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// Starts a run over a fresh permutation of the cases.
    ///
    /// Outside the intro this is ignored without drawing from the generator.
    pub fn start(&mut self) -> Outcome {
        let stage = self.session.stage();
        if stage != Stage::Intro {
            tracing::debug!(stage = %stage, event = "start", "Event not enabled, ignoring");
            return Outcome::Ignored;
        }
        let mut sequence = self.cases.clone();
        sequence.as_mut_slice().shuffle(&mut self.rng);
        let at = self.clock.now();
        self.dispatch(Event::Start { sequence, at })
    }

    /// Selects yes/no for the displayed case.
    pub fn set_decision(&mut self, decision: Diagnosis) -> Outcome {
        self.dispatch(Event::SetDecision(decision))
    }

    /// Moves the confidence slider for the displayed case.
    ///
    /// # Errors
    ///
    /// Returns `DemoError::InvalidConfidence` if `value` is above 10.
    pub fn set_confidence(&mut self, value: u32) -> Result<Outcome> {
        let confidence = Confidence::new(value)?;
        Ok(self.dispatch(Event::SetConfidence(confidence)))
    }

    /// Submits the displayed case.
    pub fn advance(&mut self) -> Outcome {
        let at = self.clock.now();
        self.dispatch(Event::Advance { at })
    }

    /// Shows the results after the last case.
    pub fn view_results(&mut self) -> Outcome {
        self.dispatch(Event::ViewResults)
    }

    /// Abandons the run and returns to the intro.
    pub fn exit(&mut self) -> Outcome {
        self.dispatch(Event::Exit)
    }

    /// Applies an event to the current session.
    pub fn dispatch(&mut self, event: Event) -> Outcome {
        let session = std::mem::take(&mut self.session);
        let result = transition(session, event);
        self.session = result.session;
        result.outcome
    }

    /// Summary of the finished run; `None` until every case is answered.
    #[must_use]
    pub fn summary(&self) -> Option<Summary> {
        self.session
            .stage()
            .is_complete()
            .then(|| Summary::from_responses(self.session.responses()))
    }
}
