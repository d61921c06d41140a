//! Reader study arm overview.
//!
//! A fixed catalog of the three planned study arms. Selecting an arm swaps the
//! intent, mechanism and KPI cards; a single toggle opens the orchestrator
//! pseudocode panel. KPI values are placeholders until estimates exist.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregate::NOT_AVAILABLE_GLYPH;
use crate::error::DemoError;

/// Overview heading.
pub const ARMS_TITLE: &str = "CXR Reader Study: Interactive Overview";

/// Orchestrator pseudocode shown in the pseudocode panel.
pub const PSEUDOCODE: &str = "\
function assist(case) {
  const read = getInitialReaderAssessment(case)
  const ai = getAISuggestion(case) // label + rationale + confidence
  const framed = applyAdaptiveFraming(ai, case) // Arm 3 only
  const decision = reconcile(read, framed ?? ai)
  logLatencySLOs()
  return decision
}";

// ============================================================================
// ArmKey
// ============================================================================

/// Identifier of a study arm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ArmKey {
    /// Unaided reading.
    #[default]
    Control,
    /// AI suggestion with a short rationale.
    Ai,
    /// AI suggestion with adaptive confidence framing.
    AiAdaptive,
}

impl ArmKey {
    /// All keys, in selector order.
    pub const ALL: [Self; 3] = [Self::Control, Self::Ai, Self::AiAdaptive];

    /// Parses a key case-insensitively. `ai-adaptive` is accepted as well.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "control" => Some(Self::Control),
            "ai" => Some(Self::Ai),
            "ai_adaptive" | "ai-adaptive" => Some(Self::AiAdaptive),
            _ => None,
        }
    }

    /// Returns the key name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::Ai => "ai",
            Self::AiAdaptive => "ai_adaptive",
        }
    }
}

impl fmt::Display for ArmKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArmKey {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_case_insensitive(s).ok_or_else(|| DemoError::InvalidArm {
            value: s.to_string(),
        })
    }
}

impl<'de> Deserialize<'de> for ArmKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid arm '{s}': expected one of 'control', 'ai', 'ai_adaptive'"
            ))
        })
    }
}

impl Serialize for ArmKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// Arm catalog
// ============================================================================

/// One KPI card of an arm. `value` stays empty until an estimate is filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArmKpi {
    /// Card heading.
    pub label: &'static str,
    /// Estimate, if known.
    pub value: Option<&'static str>,
    /// Small print under the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

impl ArmKpi {
    const fn pending(label: &'static str) -> Self {
        Self {
            label,
            value: None,
            note: None,
        }
    }

    const fn pending_with_note(label: &'static str, note: &'static str) -> Self {
        Self {
            label,
            value: None,
            note: Some(note),
        }
    }

    /// The value as displayed, with the placeholder glyph when missing.
    #[must_use]
    pub fn display_value(&self) -> &'static str {
        self.value.unwrap_or(NOT_AVAILABLE_GLYPH)
    }
}

/// One study arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Arm {
    /// Catalog key.
    pub key: ArmKey,
    /// Panel heading.
    pub title: &'static str,
    /// Text of the selector option.
    pub option_label: &'static str,
    /// What the arm is meant to measure.
    pub intent: &'static str,
    /// How assistance is delivered to the reader.
    pub mechanism: &'static str,
    /// The four KPI cards.
    pub kpis: [ArmKpi; 4],
    /// Analysis notes.
    pub notes: &'static str,
}

const CONTROL: Arm = Arm {
    key: ArmKey::Control,
    title: "Arm 1: Control (No AI)",
    option_label: "Arm 1: Control",
    intent: "Establish baseline reader performance without assistance.",
    mechanism: "Radiologist reads the CXR unaided; no suggestion/uncertainty framing is shown.",
    kpis: [
        ArmKpi::pending_with_note("Diagnostic Accuracy (AUC)", "Fill from ITT"),
        ArmKpi::pending_with_note("Escalation Rate", "CT / specialist referral"),
        ArmKpi::pending("Reading Time (sec)"),
        ArmKpi::pending("Calibration / Overconfidence"),
    ],
    notes: "Used for ITT contrasts with Arm 2/3. Post-decision reveal extension can probe counterfactual shifts.",
};

const AI: Arm = Arm {
    key: ArmKey::Ai,
    title: "Arm 2: AI Assistance (Explainer + Suggestion)",
    option_label: "Arm 2: AI Assistance",
    intent: "Measure effect of AI suggestion + explanation on reader behavior.",
    mechanism: "After initial read (or at read time), the assistant displays predicted label + short rationale. Reader can override/accept.",
    kpis: [
        ArmKpi::pending("Δ Accuracy vs Control"),
        ArmKpi::pending("Δ Escalation vs Control"),
        ArmKpi::pending("Reading Time (sec)"),
        ArmKpi::pending("Appropriate Overrides (%)"),
    ],
    notes: "Primary behavior channel: suggestion nudges borderline cases; risk: anchoring. Guardrails and verifier logic limit unsafe nudges.",
};

const AI_ADAPTIVE: Arm = Arm {
    key: ArmKey::AiAdaptive,
    title: "Arm 3: AI + Adaptive Confidence Framing",
    option_label: "Arm 3: AI + Adaptive Framing",
    intent: "Test whether calibrated, adaptive uncertainty framing improves safety vs simple suggestions.",
    mechanism: "Assistant surfaces suggestion + a confidence frame (e.g., 'low certainty, seek escalation'). Framing adapts to case difficulty.",
    kpis: [
        ArmKpi::pending("Δ Accuracy vs Control"),
        ArmKpi::pending("Δ Escalation vs Control"),
        ArmKpi::pending("Time to Decision (sec)"),
        ArmKpi::pending("Unsafe Acceptance Rate (%)"),
    ],
    notes: "Hypothesis: calibrated framing reduces over-trust in AI and improves escalation on uncertain cases.",
};

impl Arm {
    /// Looks up an arm in the catalog.
    #[must_use]
    pub const fn get(key: ArmKey) -> &'static Self {
        match key {
            ArmKey::Control => &CONTROL,
            ArmKey::Ai => &AI,
            ArmKey::AiAdaptive => &AI_ADAPTIVE,
        }
    }
}

// ============================================================================
// ArmOverview
// ============================================================================

/// Selected arm plus the pseudocode panel toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArmOverview {
    selected: ArmKey,
    show_pseudocode: bool,
}

impl ArmOverview {
    /// Opens the overview on `key` with the pseudocode panel closed.
    #[must_use]
    pub const fn new(key: ArmKey) -> Self {
        Self {
            selected: key,
            show_pseudocode: false,
        }
    }

    /// Switches the selected arm. The pseudocode panel is left as it is.
    pub fn select(&mut self, key: ArmKey) {
        if key != self.selected {
            tracing::debug!(from = %self.selected, to = %key, "Arm changed");
        }
        self.selected = key;
    }

    /// Currently selected key.
    #[must_use]
    pub const fn selected(&self) -> ArmKey {
        self.selected
    }

    /// Currently selected arm.
    #[must_use]
    pub const fn arm(&self) -> &'static Arm {
        Arm::get(self.selected)
    }

    /// Opens or closes the pseudocode panel.
    pub fn set_pseudocode(&mut self, open: bool) {
        self.show_pseudocode = open;
    }

    /// Flips the pseudocode panel.
    pub fn toggle_pseudocode(&mut self) {
        self.show_pseudocode = !self.show_pseudocode;
    }

    /// Whether the pseudocode panel is open.
    #[must_use]
    pub const fn show_pseudocode(&self) -> bool {
        self.show_pseudocode
    }

    /// The pseudocode, only while the panel is open.
    #[must_use]
    pub const fn pseudocode(&self) -> Option<&'static str> {
        if self.show_pseudocode {
            Some(PSEUDOCODE)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selection_is_control() {
        let overview = ArmOverview::default();
        assert_eq!(overview.selected(), ArmKey::Control);
        assert_eq!(overview.arm().title, "Arm 1: Control (No AI)");
        assert!(!overview.show_pseudocode());
        assert!(overview.pseudocode().is_none());
    }

    #[test]
    fn test_select_changes_arm() {
        let mut overview = ArmOverview::default();
        overview.select(ArmKey::AiAdaptive);

        let arm = overview.arm();
        assert_eq!(arm.key, ArmKey::AiAdaptive);
        assert_eq!(arm.kpis[3].label, "Unsafe Acceptance Rate (%)");
        assert!(arm.intent.starts_with("Test whether calibrated"));
    }

    #[test]
    fn test_every_arm_has_four_kpis() {
        for key in ArmKey::ALL {
            let arm = Arm::get(key);
            assert_eq!(arm.key, key);
            assert_eq!(arm.kpis.len(), 4);
        }
    }

    #[test]
    fn test_missing_value_shows_placeholder() {
        let kpi = Arm::get(ArmKey::Control).kpis[0];
        assert!(kpi.value.is_none());
        assert_eq!(kpi.display_value(), NOT_AVAILABLE_GLYPH);
        assert_eq!(kpi.note, Some("Fill from ITT"));

        let filled = ArmKpi {
            value: Some("0.87"),
            ..kpi
        };
        assert_eq!(filled.display_value(), "0.87");
    }

    #[test]
    fn test_pseudocode_toggle() {
        let mut overview = ArmOverview::new(ArmKey::Ai);
        overview.toggle_pseudocode();
        assert!(overview.show_pseudocode());
        assert!(overview.pseudocode().unwrap().starts_with("function assist(case)"));

        overview.select(ArmKey::Control);
        assert!(overview.show_pseudocode());

        overview.toggle_pseudocode();
        assert!(overview.pseudocode().is_none());

        overview.set_pseudocode(true);
        assert!(overview.show_pseudocode());
    }

    #[test]
    fn test_arm_key_parsing() {
        assert_eq!("CONTROL".parse::<ArmKey>().unwrap(), ArmKey::Control);
        assert_eq!("ai".parse::<ArmKey>().unwrap(), ArmKey::Ai);
        assert_eq!(" AI-Adaptive ".parse::<ArmKey>().unwrap(), ArmKey::AiAdaptive);
        assert!(matches!(
            "placebo".parse::<ArmKey>(),
            Err(DemoError::InvalidArm { .. })
        ));
    }

    #[test]
    fn test_arm_serialization() {
        let json = serde_json::to_string(Arm::get(ArmKey::AiAdaptive)).unwrap();
        assert!(json.contains(r#""key":"ai_adaptive""#));
        assert!(json.contains(r#""optionLabel":"Arm 3: AI + Adaptive Framing""#));
        assert!(json.contains(r#""value":null"#));

        let key: ArmKey = serde_json::from_str(r#""Ai_Adaptive""#).unwrap();
        assert_eq!(key, ArmKey::AiAdaptive);
    }
}
