//! Session state for the radiology RCT demo.
//!
//! A [`Session`] is the whole in-memory state of one run: the current
//! [`Stage`], the shuffled case sequence, the answer being composed for the
//! displayed case, and the [`Response`]s recorded so far. It is only changed
//! through [`crate::transition::transition`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::case::{Case, CaseId, Diagnosis};
use crate::error::{DemoError, Result};

// ============================================================================
// Stage
// ============================================================================

/// Stage of the demo flow.
///
/// The stage moves strictly forward:
/// `Intro` -> `Experiment` -> `PostExperiment` -> `Results`,
/// and `Exit` returns to `Intro` from anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Explanation page, no active run.
    #[default]
    Intro,
    /// Cases are being answered one at a time.
    Experiment,
    /// All cases answered; results not shown yet.
    PostExperiment,
    /// Read-only results view.
    Results,
}

impl Stage {
    /// Returns `true` once every case in the sequence has been answered.
    ///
    /// # Examples
    ///
    /// ```
    /// use demos_core::Stage;
    ///
    /// assert!(Stage::PostExperiment.is_complete());
    /// assert!(Stage::Results.is_complete());
    /// assert!(!Stage::Experiment.is_complete());
    /// ```
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::PostExperiment | Self::Results)
    }

    /// Returns the kebab-case name of the stage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Experiment => "experiment",
            Self::PostExperiment => "post-experiment",
            Self::Results => "results",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Confidence
// ============================================================================

/// Confidence rating on the 0-10 slider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    /// Highest rating on the slider.
    pub const MAX: u8 = 10;

    /// Creates a rating, rejecting values above [`Confidence::MAX`].
    ///
    /// # Examples
    ///
    /// ```
    /// use demos_core::Confidence;
    ///
    /// assert_eq!(Confidence::new(7).unwrap().value(), 7);
    /// assert!(Confidence::new(11).is_err());
    /// ```
    pub fn new(value: u32) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
            .ok_or(DemoError::InvalidConfidence { value })
    }

    /// Returns the rating.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for Confidence {
    type Error = DemoError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Confidence> for u8 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.0, Self::MAX)
    }
}

// ============================================================================
// Response
// ============================================================================

/// The recorded answer for one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Case that was answered.
    pub case_id: CaseId,

    /// Ground truth of that case.
    pub truth: Diagnosis,

    /// Whether the case showed an advisory.
    pub has_advisory: bool,

    /// Advisory text shown, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory_label: Option<String>,

    /// The user's decision.
    pub decision: Diagnosis,

    /// The user's confidence in the decision.
    pub confidence: Confidence,

    /// `decision == truth`.
    pub is_correct: bool,

    /// Time the case was on screen, if the timer was running.
    pub time_ms: Option<u64>,
}

impl Response {
    /// Builds the response for `case`, deriving the correctness flag.
    #[must_use]
    pub fn new(
        case: &Case,
        decision: Diagnosis,
        confidence: Confidence,
        time_ms: Option<u64>,
    ) -> Self {
        Self {
            case_id: case.id,
            truth: case.truth,
            has_advisory: case.has_advisory,
            advisory_label: case.advisory_label.clone(),
            decision,
            confidence,
            is_correct: decision == case.truth,
            time_ms,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// In-memory state of one run through the demo.
///
/// `Session::default()` is the intro state: no sequence, no responses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub(crate) stage: Stage,
    pub(crate) sequence: Vec<Case>,
    pub(crate) current_index: usize,
    pub(crate) decision: Option<Diagnosis>,
    pub(crate) confidence: Confidence,
    pub(crate) responses: Vec<Response>,
    pub(crate) case_started_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a session in the intro stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Cases in the order they are shown.
    #[must_use]
    pub fn sequence(&self) -> &[Case] {
        &self.sequence
    }

    /// Zero-based index of the displayed case.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// The displayed case, only while answering.
    #[must_use]
    pub fn current_case(&self) -> Option<&Case> {
        if self.stage == Stage::Experiment {
            self.sequence.get(self.current_index)
        } else {
            None
        }
    }

    /// Returns `true` if the displayed case is the last one.
    #[must_use]
    pub fn is_last_case(&self) -> bool {
        self.current_index + 1 == self.sequence.len()
    }

    /// Decision selected for the displayed case, if any.
    #[must_use]
    pub const fn decision(&self) -> Option<Diagnosis> {
        self.decision
    }

    /// Confidence selected for the displayed case.
    #[must_use]
    pub const fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// Whether advancing is currently allowed.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.stage == Stage::Experiment && self.decision.is_some()
    }

    /// Responses recorded so far, in answer order.
    #[must_use]
    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// When the displayed case was first shown.
    #[must_use]
    pub const fn case_started_at(&self) -> Option<DateTime<Utc>> {
        self.case_started_at
    }

    /// Progress through the sequence.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.sequence.len();
        let answered = self.responses.len();
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.stage.is_complete(),
        }
    }
}

/// Aggregated view of session progress, useful for the prompt header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// Number of cases in the sequence.
    pub total: usize,
    /// Number of recorded responses.
    pub answered: usize,
    /// Cases still to answer.
    pub remaining: usize,
    /// Every case has been answered.
    pub is_complete: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::case::{default_cases, Sex};

    #[test]
    fn test_stage_serialization() {
        assert_eq!(serde_json::to_string(&Stage::Intro).unwrap(), r#""intro""#);
        assert_eq!(
            serde_json::to_string(&Stage::PostExperiment).unwrap(),
            r#""post-experiment""#
        );
        let stage: Stage = serde_json::from_str(r#""results""#).unwrap();
        assert_eq!(stage, Stage::Results);
    }

    #[test]
    fn test_stage_display_matches_serde() {
        for stage in [
            Stage::Intro,
            Stage::Experiment,
            Stage::PostExperiment,
            Stage::Results,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{stage}\""));
        }
    }

    #[test]
    fn test_confidence_bounds() {
        assert_eq!(Confidence::new(0).unwrap().value(), 0);
        assert_eq!(Confidence::new(10).unwrap().value(), 10);
        assert!(matches!(
            Confidence::new(11),
            Err(DemoError::InvalidConfidence { value: 11 })
        ));
        assert!(Confidence::new(300).is_err());
        assert_eq!(Confidence::default().value(), 0);
    }

    #[test]
    fn test_confidence_serde() {
        let c: Confidence = serde_json::from_str("8").unwrap();
        assert_eq!(c.value(), 8);
        assert_eq!(serde_json::to_string(&c).unwrap(), "8");
        assert!(serde_json::from_str::<Confidence>("12").is_err());
    }

    #[test]
    fn test_response_correctness() {
        let case = Case::new(1, Diagnosis::Yes, 67, Sex::F);
        let confidence = Confidence::new(5).unwrap();

        let right = Response::new(&case, Diagnosis::Yes, confidence, Some(1200));
        assert!(right.is_correct);

        let wrong = Response::new(&case, Diagnosis::No, confidence, Some(1200));
        assert!(!wrong.is_correct);
    }

    #[test]
    fn test_response_copies_advisory() {
        let case = &default_cases()[2];
        let resp = Response::new(case, Diagnosis::No, Confidence::default(), None);
        assert!(resp.has_advisory);
        assert_eq!(resp.advisory_label.as_deref(), Some("PE unlikely"));
        assert_eq!(resp.truth, Diagnosis::Yes);
        assert!(resp.time_ms.is_none());
    }

    #[test]
    fn test_new_session_is_intro() {
        let session = Session::new();
        assert_eq!(session.stage(), Stage::Intro);
        assert!(session.sequence().is_empty());
        assert!(session.responses().is_empty());
        assert!(session.current_case().is_none());
        assert!(!session.can_advance());
        assert_eq!(
            session.progress(),
            SessionProgress {
                total: 0,
                answered: 0,
                remaining: 0,
                is_complete: false,
            }
        );
    }
}
