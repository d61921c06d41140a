//! Demos Report Generation
//!
//! Renders the results of one completed radiology RCT run. Reports can be
//! serialized to JSON for programmatic access or rendered to Markdown as the
//! human-readable results view.
//!
//! # Generators
//!
//! - [`json::JsonGenerator`] - compact or pretty JSON
//! - [`MarkdownGenerator`] - the results view as Markdown
//!
//! # Example
//!
//! ```rust
//! use demos_core::Summary;
//! use demos_report::{MarkdownGenerator, Report};
//!
//! let report = Report::builder()
//!     .title("Analysis Results (Demo)")
//!     .summary(Summary::from_responses(&[]))
//!     .build()
//!     .unwrap();
//!
//! let markdown = MarkdownGenerator::new(&report).generate();
//! assert!(markdown.starts_with("# Analysis Results (Demo)"));
//! ```

pub mod json;
mod markdown;

pub use markdown::MarkdownGenerator;

use chrono::{DateTime, Utc};
use demos_core::{Response, Summary};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title used when the caller does not provide one.
pub const DEFAULT_TITLE: &str = "Analysis Results (Demo)";

/// File name of the Markdown report.
pub const MARKDOWN_FILE_NAME: &str = "rct-report.md";

/// File name of the JSON report.
pub const JSON_FILE_NAME: &str = "rct-report.json";

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to serialize the report to JSON.
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to write report files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid report data.
    #[error("invalid report data: {0}")]
    InvalidData(String),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

// ============================================================================
// Report
// ============================================================================

/// Results of one completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Report heading.
    pub title: String,

    /// When the report was generated.
    pub generated_at: DateTime<Utc>,

    /// Shuffle seed of the run, if it was seeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Aggregated metrics.
    pub summary: Summary,

    /// Recorded responses, in answer order.
    #[serde(default)]
    pub responses: Vec<Response>,
}

impl Report {
    /// Creates a new report builder.
    #[must_use]
    pub fn builder() -> ReportBuilder {
        ReportBuilder::default()
    }

    /// Builds a report for `responses` with the default title, aggregating them.
    #[must_use]
    pub fn from_responses(responses: &[Response], seed: Option<u64>) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            generated_at: Utc::now(),
            seed,
            summary: Summary::from_responses(responses),
            responses: responses.to_vec(),
        }
    }

    /// Serializes the report to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Serialization` if JSON serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ReportError::from)
    }
}

// ============================================================================
// ReportBuilder
// ============================================================================

/// Builder for constructing [`Report`] instances.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    title: Option<String>,
    generated_at: Option<DateTime<Utc>>,
    seed: Option<u64>,
    summary: Option<Summary>,
    responses: Vec<Response>,
}

impl ReportBuilder {
    /// Sets the report heading.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the generation timestamp. Defaults to now.
    #[must_use]
    pub const fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Records the shuffle seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the aggregated metrics.
    #[must_use]
    pub const fn summary(mut self, summary: Summary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Sets the recorded responses.
    #[must_use]
    pub fn responses(mut self, responses: Vec<Response>) -> Self {
        self.responses = responses;
        self
    }

    /// Builds the report.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidData` if the title or summary is missing,
    /// or if the summary does not count the given responses.
    pub fn build(self) -> Result<Report> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ReportError::InvalidData("title is required".to_string()))?;

        let summary = self
            .summary
            .ok_or_else(|| ReportError::InvalidData("summary is required".to_string()))?;

        if !self.responses.is_empty() && summary.total() != self.responses.len() {
            return Err(ReportError::InvalidData(format!(
                "summary counts {} responses but {} were given",
                summary.total(),
                self.responses.len()
            )));
        }

        Ok(Report {
            title,
            generated_at: self.generated_at.unwrap_or_else(Utc::now),
            seed: self.seed,
            summary,
            responses: self.responses,
        })
    }
}
