//! Pure state transition function for the RCT demo flow.
//!
//! `transition` takes the current [`Session`] and an [`Event`] and returns the
//! next session. It performs no I/O: the shuffled sequence and every
//! timestamp arrive inside the event, so the whole flow can be tested without
//! a clock, a random generator or a terminal.

use chrono::{DateTime, Utc};

use crate::case::{Case, Diagnosis};
use crate::session::{Confidence, Response, Session, Stage};

/// User actions that can move the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a run over `sequence`; `at` starts the first case's timer.
    Start {
        /// Cases in display order.
        sequence: Vec<Case>,
        /// When the first case is shown.
        at: DateTime<Utc>,
    },
    /// Select yes/no for the displayed case.
    SetDecision(Diagnosis),
    /// Move the confidence slider for the displayed case.
    SetConfidence(Confidence),
    /// Submit the displayed case and move on.
    Advance {
        /// When the answer was submitted.
        at: DateTime<Utc>,
    },
    /// Reveal the results after the last case.
    ViewResults,
    /// Abandon the run and go back to the intro.
    Exit,
}

impl Event {
    /// Short name used in log fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::SetDecision(_) => "set_decision",
            Self::SetConfidence(_) => "set_confidence",
            Self::Advance { .. } => "advance",
            Self::ViewResults => "view_results",
            Self::Exit => "exit",
        }
    }
}

/// Whether an event changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The event was valid for the stage and has been applied.
    Applied,
    /// The event is disabled in the current stage; the session is unchanged.
    Ignored,
}

/// Result of a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The session after the transition.
    pub session: Session,
    /// Whether the event was applied.
    pub outcome: Outcome,
}

impl TransitionResult {
    const fn applied(session: Session) -> Self {
        Self {
            session,
            outcome: Outcome::Applied,
        }
    }

    const fn ignored(session: Session) -> Self {
        Self {
            session,
            outcome: Outcome::Ignored,
        }
    }

    /// Returns `true` if the event was applied.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.outcome == Outcome::Applied
    }
}

/// Pure state transition function.
///
/// Events that are not enabled in the current stage are ignored rather than
/// rejected; this mirrors a UI where the corresponding control is disabled.
pub fn transition(session: Session, event: Event) -> TransitionResult {
    match (session.stage, event) {
        // Exit is available everywhere and always discards the run.
        (from, Event::Exit) => {
            tracing::debug!(
                from = %from,
                responses = session.responses.len(),
                "Exit requested, resetting session"
            );
            TransitionResult::applied(Session::default())
        }

        (Stage::Intro, Event::Start { sequence, at }) => {
            if sequence.is_empty() {
                tracing::warn!("Start requested with an empty case sequence");
                return TransitionResult::ignored(session);
            }
            tracing::info!(cases = sequence.len(), "Demo started");
            let capacity = sequence.len();
            TransitionResult::applied(Session {
                stage: Stage::Experiment,
                sequence,
                current_index: 0,
                decision: None,
                confidence: Confidence::default(),
                responses: Vec::with_capacity(capacity),
                case_started_at: Some(at),
            })
        }

        (Stage::Experiment, Event::SetDecision(decision)) => TransitionResult::applied(Session {
            decision: Some(decision),
            ..session
        }),

        (Stage::Experiment, Event::SetConfidence(confidence)) => {
            TransitionResult::applied(Session {
                confidence,
                ..session
            })
        }

        (Stage::Experiment, Event::Advance { at }) => advance(session, at),

        (Stage::PostExperiment, Event::ViewResults) => {
            tracing::debug!(responses = session.responses.len(), "Showing results");
            TransitionResult::applied(Session {
                stage: Stage::Results,
                ..session
            })
        }

        (stage, event) => {
            tracing::debug!(stage = %stage, event = event.name(), "Event not enabled, ignoring");
            TransitionResult::ignored(session)
        }
    }
}

/// Records the displayed case and moves to the next one (or finishes).
fn advance(mut session: Session, at: DateTime<Utc>) -> TransitionResult {
    let Some(decision) = session.decision else {
        tracing::debug!(
            index = session.current_index,
            "Advance ignored: no decision selected"
        );
        return TransitionResult::ignored(session);
    };

    let Some(case) = session.sequence.get(session.current_index) else {
        tracing::warn!(
            index = session.current_index,
            len = session.sequence.len(),
            "Advance ignored: index outside the sequence"
        );
        return TransitionResult::ignored(session);
    };

    // A clock that went backwards yields no timing rather than a bogus value.
    let time_ms = session
        .case_started_at
        .and_then(|started| u64::try_from((at - started).num_milliseconds()).ok());
    let response = Response::new(case, decision, session.confidence, time_ms);

    tracing::debug!(
        case_id = %response.case_id,
        decision = %response.decision,
        confidence = response.confidence.value(),
        correct = response.is_correct,
        time_ms = ?response.time_ms,
        "Response recorded"
    );
    session.responses.push(response);

    if session.is_last_case() {
        session.stage = Stage::PostExperiment;
        session.case_started_at = None;
        tracing::info!(responses = session.responses.len(), "All cases answered");
    } else {
        session.current_index += 1;
        session.decision = None;
        session.confidence = Confidence::default();
        session.case_started_at = Some(at);
    }

    TransitionResult::applied(session)
}

// ============================================================================
// Tests
// ============================================================================
