//! Social protection / just transition scenario dashboard.
//!
//! A fixed catalog of two policy scenarios. Selecting one changes the three
//! KPI cards; nothing is computed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DemoError;

/// Dashboard heading.
pub const DASHBOARD_TITLE: &str = "Social Protection / Just Transition Dashboard";

// ============================================================================
// ScenarioKey
// ============================================================================

/// Identifier of a catalog scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScenarioKey {
    /// No targeted transition policy.
    #[default]
    Baseline,
    /// Accelerated, managed green transition.
    Transition,
}

impl ScenarioKey {
    /// All keys, in selector order.
    pub const ALL: [Self; 2] = [Self::Baseline, Self::Transition];

    /// Parses a key case-insensitively.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "baseline" => Some(Self::Baseline),
            "transition" => Some(Self::Transition),
            _ => None,
        }
    }

    /// Returns the lowercase key name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Transition => "transition",
        }
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKey {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_case_insensitive(s).ok_or_else(|| DemoError::InvalidScenario {
            value: s.to_string(),
        })
    }
}

impl<'de> Deserialize<'de> for ScenarioKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid scenario '{s}': expected one of 'baseline', 'transition'"
            ))
        })
    }
}

impl Serialize for ScenarioKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// Scenario
// ============================================================================

/// One policy scenario and its headline numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Catalog key.
    pub key: ScenarioKey,
    /// Scenario name.
    pub label: &'static str,
    /// Text of the selector option.
    pub option_label: &'static str,
    /// Workers at risk of displacement.
    pub exposed_workers: u64,
    /// Public retraining budget, in millions of USD.
    pub retraining_cost_musd: u64,
    /// Households needing temporary income support.
    pub households_at_risk: u64,
    /// One-sentence narrative.
    pub blurb: &'static str,
}

const BASELINE: Scenario = Scenario {
    key: ScenarioKey::Baseline,
    label: "Current policy baseline",
    option_label: "Baseline (do nothing)",
    exposed_workers: 80_000,
    retraining_cost_musd: 120,
    households_at_risk: 15_000,
    blurb: "No targeted transition policy. High displacement risk in carbon-intensive sectors, mostly unmanaged by social protection.",
};

const TRANSITION: Scenario = Scenario {
    key: ScenarioKey::Transition,
    label: "Accelerated green transition",
    option_label: "Managed transition",
    exposed_workers: 55_000,
    retraining_cost_musd: 180,
    households_at_risk: 9_000,
    blurb: "Active reskilling + income support. Fewer vulnerable households, but higher up-front training budget and coordination needs.",
};

impl Scenario {
    /// Looks up a scenario in the catalog.
    #[must_use]
    pub const fn get(key: ScenarioKey) -> &'static Self {
        match key {
            ScenarioKey::Baseline => &BASELINE,
            ScenarioKey::Transition => &TRANSITION,
        }
    }

    /// Caption under the selector: label followed by the blurb.
    #[must_use]
    pub fn caption(&self) -> String {
        format!("{}. {}", self.label, self.blurb)
    }
}

/// One headline number as displayed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiCard {
    /// Card heading.
    pub title: &'static str,
    /// Formatted value.
    pub value: String,
    /// Explanation under the value.
    pub caption: &'static str,
}

// ============================================================================
// Dashboard
// ============================================================================

/// The selected scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dashboard {
    selected: ScenarioKey,
}

impl Dashboard {
    /// Opens the dashboard on `key`.
    #[must_use]
    pub const fn new(key: ScenarioKey) -> Self {
        Self { selected: key }
    }

    /// Switches the selected scenario.
    pub fn select(&mut self, key: ScenarioKey) {
        if key != self.selected {
            tracing::debug!(from = %self.selected, to = %key, "Scenario changed");
        }
        self.selected = key;
    }

    /// Currently selected key.
    #[must_use]
    pub const fn selected(&self) -> ScenarioKey {
        self.selected
    }

    /// Currently selected scenario.
    #[must_use]
    pub const fn scenario(&self) -> &'static Scenario {
        Scenario::get(self.selected)
    }

    /// The three KPI cards of the selected scenario.
    #[must_use]
    pub fn kpis(&self) -> [KpiCard; 3] {
        let s = self.scenario();
        [
            KpiCard {
                title: "Exposed workers",
                value: format_thousands(s.exposed_workers),
                caption: "Jobs at risk of displacement",
            },
            KpiCard {
                title: "Retraining budget",
                value: format!("${}M", s.retraining_cost_musd),
                caption: "Public financing estimate",
            },
            KpiCard {
                title: "At-risk households",
                value: format_thousands(s.households_at_risk),
                caption: "Need income stabilization / transfers",
            },
        ]
    }
}

/// Formats an integer with comma thousands separators.
///
/// # Examples
///
/// ```
/// use demos_core::format_thousands;
///
/// assert_eq!(format_thousands(80_000), "80,000");
/// assert_eq!(format_thousands(999), "999");
/// ```
#[must_use]
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
