//! Case fixtures for the radiology RCT demo.
//!
//! A [`Case`] is one simulated CT read: a ground-truth PE label, basic patient
//! information and, for half of the default table, a simulated AI advisory.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// CaseId
// ============================================================================

/// Identifier of a case within the fixture table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(u32);

impl CaseId {
    /// Creates a new `CaseId`.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Diagnosis
// ============================================================================

/// Binary PE label, used both for ground truth and for the user's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diagnosis {
    /// Pulmonary embolism present.
    Yes,
    /// Pulmonary embolism absent.
    No,
}

impl Diagnosis {
    /// Parses `yes`/`no` (or `y`/`n`), case-insensitively.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" => Some(Self::Yes),
            "no" | "n" => Some(Self::No),
            _ => None,
        }
    }

    /// Returns the display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Diagnosis {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid diagnosis '{s}': expected one of 'yes', 'no'"
            ))
        })
    }
}

impl Serialize for Diagnosis {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = match self {
            Self::Yes => "yes",
            Self::No => "no",
        };
        serializer.serialize_str(s)
    }
}

// ============================================================================
// Sex
// ============================================================================

/// Patient sex as shown on the case card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    /// Male.
    M,
    /// Female.
    F,
}

impl Sex {
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" => Some(Self::M),
            "f" | "female" => Some(Self::F),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::M => f.write_str("M"),
            Self::F => f.write_str("F"),
        }
    }
}

impl<'de> Deserialize<'de> for Sex {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid sex '{s}': expected one of 'M', 'F'"))
        })
    }
}

impl Serialize for Sex {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

// ============================================================================
// Case
// ============================================================================

/// One fixed diagnostic scenario shown during the demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    /// Identifier within the fixture table.
    pub id: CaseId,

    /// Ground-truth PE label.
    pub truth: Diagnosis,

    /// Whether the simulated AI assistant panel is shown for this case.
    #[serde(default)]
    pub has_advisory: bool,

    /// Suggestion text of the AI assistant panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory_label: Option<String>,

    /// Patient age in years.
    pub age: u8,

    /// Patient sex.
    pub sex: Sex,
}

/// Shown in the assistant panel when an advisory case carries no label.
pub const MISSING_ADVISORY_LABEL: &str = "N/A";

impl Case {
    /// Creates a case without an advisory.
    #[must_use]
    pub const fn new(id: u32, truth: Diagnosis, age: u8, sex: Sex) -> Self {
        Self {
            id: CaseId::new(id),
            truth,
            has_advisory: false,
            advisory_label: None,
            age,
            sex,
        }
    }

    /// Attaches a simulated advisory with the given suggestion text.
    #[must_use]
    pub fn with_advisory(mut self, label: impl Into<String>) -> Self {
        self.has_advisory = true;
        self.advisory_label = Some(label.into());
        self
    }

    /// Returns the suggestion to display, or `None` when no panel is shown.
    #[must_use]
    pub fn advisory_text(&self) -> Option<&str> {
        self.has_advisory
            .then(|| self.advisory_label.as_deref().unwrap_or(MISSING_ADVISORY_LABEL))
    }
}

/// The ten built-in cases: five with an advisory, five without.
///
/// Two of the advisories (cases 3 and 4) contradict the ground truth.
#[must_use]
pub fn default_cases() -> Vec<Case> {
    use Diagnosis::{No, Yes};
    use Sex::{F, M};

    vec![
        Case::new(1, Yes, 67, F).with_advisory("PE likely"),
        Case::new(2, No, 54, M).with_advisory("PE unlikely"),
        Case::new(3, Yes, 72, M).with_advisory("PE unlikely"),
        Case::new(4, No, 45, F).with_advisory("PE likely"),
        Case::new(5, Yes, 60, F).with_advisory("PE likely"),
        Case::new(6, No, 51, M),
        Case::new(7, Yes, 69, F),
        Case::new(8, No, 39, F),
        Case::new(9, Yes, 58, M),
        Case::new(10, No, 63, F),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_default_cases_shape() {
        let cases = default_cases();
        assert_eq!(cases.len(), 10);

        let ids: HashSet<_> = cases.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 10, "case ids must be unique");

        let with_advisory = cases.iter().filter(|c| c.has_advisory).count();
        assert_eq!(with_advisory, 5);

        let positives = cases.iter().filter(|c| c.truth == Diagnosis::Yes).count();
        assert_eq!(positives, 5);
    }

    #[test]
    fn test_advisory_text() {
        let cases = default_cases();
        assert_eq!(cases[0].advisory_text(), Some("PE likely"));
        assert_eq!(cases[5].advisory_text(), None);

        let unlabeled = Case {
            has_advisory: true,
            ..Case::new(11, Diagnosis::No, 40, Sex::M)
        };
        assert_eq!(unlabeled.advisory_text(), Some(MISSING_ADVISORY_LABEL));
    }

    #[test]
    fn test_diagnosis_parsing() {
        assert_eq!(Diagnosis::from_str_case_insensitive("YES"), Some(Diagnosis::Yes));
        assert_eq!(Diagnosis::from_str_case_insensitive(" n "), Some(Diagnosis::No));
        assert_eq!(Diagnosis::from_str_case_insensitive("maybe"), None);
    }

    #[test]
    fn test_case_deserialization_case_insensitive() {
        let json = r#"{"id": 3, "truth": "Yes", "hasAdvisory": true, "advisoryLabel": "PE unlikely", "age": 72, "sex": "m"}"#;
        let case: Case = serde_json::from_str(json).unwrap();
        assert_eq!(case.id, CaseId::new(3));
        assert_eq!(case.truth, Diagnosis::Yes);
        assert_eq!(case.sex, Sex::M);
        assert_eq!(case.advisory_text(), Some("PE unlikely"));
    }

    #[test]
    fn test_case_deserialization_defaults() {
        let json = r#"{"id": 6, "truth": "no", "age": 51, "sex": "M"}"#;
        let case: Case = serde_json::from_str(json).unwrap();
        assert!(!case.has_advisory);
        assert!(case.advisory_label.is_none());
    }

    #[test]
    fn test_invalid_truth_error() {
        let json = r#"{"id": 1, "truth": "unsure", "age": 30, "sex": "F"}"#;
        let err = serde_json::from_str::<Case>(json).unwrap_err().to_string();
        assert!(err.contains("invalid diagnosis"));
        assert!(err.contains("unsure"));
    }

    #[test]
    fn test_case_serialization() {
        let json = serde_json::to_string(&default_cases()[5]).unwrap();
        assert!(json.contains(r#""truth":"no""#));
        assert!(json.contains(r#""hasAdvisory":false"#));
        assert!(json.contains(r#""sex":"M""#));
        assert!(!json.contains("advisoryLabel"));
    }
}
