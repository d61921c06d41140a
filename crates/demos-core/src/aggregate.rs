//! Summary statistics over recorded responses.
//!
//! Everything here is a pure function of a `&[Response]`. Averages over an
//! empty group are [`Metric::NotAvailable`], so renderers never see NaN or a
//! misleading zero.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::session::Response;

/// Placeholder shown in place of an unavailable metric.
pub const NOT_AVAILABLE_GLYPH: &str = "—";

// ============================================================================
// Metric
// ============================================================================

/// An average or percentage that may be undefined.
///
/// Serializes as a JSON number, or `null` when not available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Metric {
    /// A computed value.
    Value(f64),
    /// The group had no data to compute from.
    NotAvailable,
}

impl Metric {
    /// `numerator / denominator × 100`, unavailable when the denominator is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use demos_core::Metric;
    ///
    /// assert_eq!(Metric::percentage(3, 4), Metric::Value(75.0));
    /// assert_eq!(Metric::percentage(0, 0), Metric::NotAvailable);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(numerator: usize, denominator: usize) -> Self {
        if denominator == 0 {
            Self::NotAvailable
        } else {
            Self::Value(numerator as f64 * 100.0 / denominator as f64)
        }
    }

    /// Arithmetic mean, unavailable for an empty sequence.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(values: impl IntoIterator<Item = f64>) -> Self {
        let (sum, count) = values
            .into_iter()
            .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            Self::NotAvailable
        } else {
            Self::Value(sum / count as f64)
        }
    }

    /// Returns the value, if available.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotAvailable => None,
        }
    }

    /// Returns `true` if a value is present.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Applies `f` to an available value.
    #[must_use]
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Value(v) => Self::Value(f(v)),
            Self::NotAvailable => Self::NotAvailable,
        }
    }
}

impl From<Option<f64>> for Metric {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::NotAvailable, Self::Value)
    }
}

impl From<Metric> for Option<f64> {
    fn from(metric: Metric) -> Self {
        metric.value()
    }
}

/// Formats to one decimal place by default (`precision` is honored), or the placeholder glyph.
impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{:.*}", f.precision().unwrap_or(1), v),
            Self::NotAvailable => f.write_str(NOT_AVAILABLE_GLYPH),
        }
    }
}

// ============================================================================
// GroupStats
// ============================================================================

/// Statistics for one group of responses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    /// Number of responses in the group.
    pub count: usize,
    /// Number of correct responses.
    pub correct: usize,
    /// Share of correct responses, in percent.
    pub accuracy: Metric,
    /// Mean confidence on the 0-10 scale.
    pub avg_confidence: Metric,
    /// Mean decision time over responses that have a timing.
    pub avg_time_ms: Metric,
}

impl GroupStats {
    /// Computes the statistics of `responses`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_responses<'a>(responses: impl IntoIterator<Item = &'a Response>) -> Self {
        let group: Vec<&Response> = responses.into_iter().collect();
        let count = group.len();
        let correct = group.iter().filter(|r| r.is_correct).count();

        Self {
            count,
            correct,
            accuracy: Metric::percentage(correct, count),
            avg_confidence: Metric::mean(group.iter().map(|r| f64::from(r.confidence.value()))),
            avg_time_ms: Metric::mean(group.iter().filter_map(|r| r.time_ms).map(|t| t as f64)),
        }
    }

    /// Mean decision time in seconds.
    #[must_use]
    pub fn avg_time_secs(&self) -> Metric {
        self.avg_time_ms.map(|ms| ms / 1000.0)
    }

    /// Returns `true` if the group has no responses.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Results of one completed run, overall and split by advisory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// All responses.
    pub overall: GroupStats,
    /// Responses to cases that showed an advisory.
    pub with_advisory: GroupStats,
    /// Responses to cases without an advisory.
    pub without_advisory: GroupStats,
}

impl Summary {
    /// Aggregates `responses`, partitioned on each response's `has_advisory` flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use demos_core::{Metric, Summary};
    ///
    /// let summary = Summary::from_responses(&[]);
    /// assert_eq!(summary.overall.count, 0);
    /// assert_eq!(summary.overall.accuracy, Metric::NotAvailable);
    /// ```
    #[must_use]
    pub fn from_responses(responses: &[Response]) -> Self {
        let (with, without): (Vec<&Response>, Vec<&Response>) =
            responses.iter().partition(|r| r.has_advisory);

        Self {
            overall: GroupStats::from_responses(responses),
            with_advisory: GroupStats::from_responses(with),
            without_advisory: GroupStats::from_responses(without),
        }
    }

    /// Total number of responses.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.overall.count
    }

    /// Total number of correct responses.
    #[must_use]
    pub const fn correct_total(&self) -> usize {
        self.overall.correct
    }
}
