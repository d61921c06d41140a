//! Markdown rendering of the results view.
//!
//! The document follows the on-screen results page: an overall performance
//! block, the with/without AI assistance comparison table, then a per-case
//! breakdown and the research-demo disclaimer.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use demos_core::{GroupStats, Metric, Response, Summary, NOT_AVAILABLE_GLYPH};

use crate::Report;

const INTRO: &str = "Below is a simple summary of your performance in this run. In a full RCT \
with many participants, these metrics would form the basis for estimating the causal effect of \
AI assistance on diagnostic accuracy, confidence, and decision time.";

const COMPARISON_NOTE: &str = "In a full analysis, you would compare these group-level metrics \
(and their uncertainty) to estimate how AI assistance changes diagnostic accuracy, confidence, \
and decision time.";

const DISCLAIMER: &str = "This is a research demo intended to illustrate experimental design and \
RCT logic. It is **not** a medical tool, does not provide clinical advice, and should not be used \
for diagnosis or treatment decisions.";

/// Generates the Markdown results view from a [`Report`].
pub struct MarkdownGenerator<'a> {
    report: &'a Report,
}

impl<'a> MarkdownGenerator<'a> {
    /// Creates a new Markdown generator for the given report.
    #[must_use]
    pub const fn new(report: &'a Report) -> Self {
        Self { report }
    }

    /// Generates the complete Markdown document.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        self.write_title(&mut output);
        self.write_overall(&mut output);
        self.write_comparison(&mut output);
        self.write_cases(&mut output);
        self.write_footer(&mut output);

        output
    }

    fn write_title(&self, output: &mut String) {
        let _ = writeln!(output, "# {}\n", escape_markdown(&self.report.title));
        let _ = writeln!(output, "{INTRO}\n");
    }

    fn write_overall(&self, output: &mut String) {
        let overall = &self.report.summary.overall;

        let _ = writeln!(output, "## Overall performance\n");
        let _ = writeln!(
            output,
            "Correct diagnoses: **{} / {}** ({})\n",
            overall.correct,
            overall.count,
            format_percent(overall.accuracy)
        );
        if let Metric::Value(secs) = overall.avg_time_secs() {
            let _ = writeln!(
                output,
                "Average decision time (all cases): **{secs:.1} seconds**\n"
            );
        }
    }

    fn write_comparison(&self, output: &mut String) {
        let _ = writeln!(output, "## With vs. without AI assistance\n");
        let _ = writeln!(output, "{}\n", comparison_table(&self.report.summary));
        let _ = writeln!(output, "*{COMPARISON_NOTE}*\n");
    }

    fn write_cases(&self, output: &mut String) {
        let _ = writeln!(output, "## Cases\n");

        if self.report.responses.is_empty() {
            let _ = writeln!(output, "*No responses recorded.*\n");
            return;
        }

        let _ = writeln!(
            output,
            "| # | Case | AI suggestion | Truth | Decision | Confidence | Time (s) | Correct |"
        );
        let _ = writeln!(
            output,
            "|---|------|---------------|-------|----------|------------|----------|---------|"
        );
        for (i, response) in self.report.responses.iter().enumerate() {
            write_case_row(output, i + 1, response);
        }
        let _ = writeln!(output);
    }

    fn write_footer(&self, output: &mut String) {
        let _ = writeln!(output, "---\n");
        let _ = writeln!(output, "**Important note:** {DISCLAIMER}\n");
        let timestamp = format_timestamp(&self.report.generated_at);
        match self.report.seed {
            Some(seed) => {
                let _ = writeln!(output, "*Generated by demos at {timestamp} (seed {seed})*");
            }
            None => {
                let _ = writeln!(output, "*Generated by demos at {timestamp}*");
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// The comparison table, without a trailing newline.
fn comparison_table(summary: &Summary) -> String {
    let mut table = String::new();
    let _ = writeln!(
        table,
        "| Condition | n | Accuracy | Avg. confidence | Avg. decision time (s) |"
    );
    let _ = writeln!(
        table,
        "|-----------|---|----------|-----------------|------------------------|"
    );
    let _ = writeln!(table, "{}", group_row("With AI assistance", &summary.with_advisory));
    let _ = write!(table, "{}", group_row("Without AI assistance", &summary.without_advisory));
    table
}

fn group_row(condition: &str, stats: &GroupStats) -> String {
    format!(
        "| {condition} | {} | {} | {:.1} | {:.1} |",
        stats.count,
        format_percent(stats.accuracy),
        stats.avg_confidence,
        stats.avg_time_secs()
    )
}

fn write_case_row(output: &mut String, position: usize, response: &Response) {
    let suggestion = response
        .has_advisory
        .then(|| {
            escape_markdown(
                response
                    .advisory_label
                    .as_deref()
                    .unwrap_or(demos_core::MISSING_ADVISORY_LABEL),
            )
        })
        .unwrap_or_else(|| NOT_AVAILABLE_GLYPH.to_string());
    #[allow(clippy::cast_precision_loss)]
    let seconds = Metric::from(response.time_ms.map(|ms| ms as f64 / 1000.0));

    let _ = writeln!(
        output,
        "| {position} | {} | {suggestion} | {} | {} | {} | {seconds:.1} | {} |",
        response.case_id,
        response.truth,
        response.decision,
        response.confidence.value(),
        if response.is_correct { "Yes" } else { "No" },
    );
}

/// `x.x%`, or the placeholder glyph.
fn format_percent(metric: Metric) -> String {
    match metric {
        Metric::Value(v) => format!("{v:.1}%"),
        Metric::NotAvailable => NOT_AVAILABLE_GLYPH.to_string(),
    }
}

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Escapes characters that would break Markdown text or table cells.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '*' | '_' | '`' | '#' | '[' | ']' | '\\' | '<' | '>' | '|' => {
                result.push('\\');
                result.push(ch);
            }
            '\n' => result.push_str("<br>"),
            _ => result.push(ch),
        }
    }

    result
}
