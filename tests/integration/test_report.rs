//! Integration tests for report generation from completed runs.

use chrono::Duration;
use demos_core::{default_cases, fixed_now, Clock, DemoFlow, Diagnosis};
use demos_report::json::JsonGenerator;
use demos_report::{MarkdownGenerator, Report, ReportError};

/// Runs a full seeded session, answering "yes" for cases with an advisory
/// and "no" otherwise, with a known confidence and a two second decision time.
fn completed_flow() -> DemoFlow {
    let mut flow =
        DemoFlow::with_seed(default_cases(), 77).with_clock(Clock::fixed(fixed_now()));
    flow.start();
    while let Some(has_advisory) = flow.session().current_case().map(|c| c.has_advisory) {
        let decision = if has_advisory {
            Diagnosis::Yes
        } else {
            Diagnosis::No
        };
        flow.set_decision(decision);
        flow.set_confidence(if has_advisory { 8 } else { 4 })
            .expect("confidence in range");
        flow.clock_mut().advance(Duration::seconds(2));
        flow.advance();
    }
    flow.view_results();
    flow
}

fn report_for(flow: &DemoFlow) -> Report {
    let summary = flow.summary().expect("run is complete");
    Report::builder()
        .title("Analysis Results (Demo)")
        .summary(summary)
        .responses(flow.session().responses().to_vec())
        .seed(flow.seed().expect("seeded run"))
        .generated_at(fixed_now())
        .build()
        .expect("valid report")
}

#[test]
fn test_markdown_report_for_completed_run() {
    let flow = completed_flow();
    let report = report_for(&flow);
    let markdown = MarkdownGenerator::new(&report).generate();

    // Advisory cases 1, 3 and 5 are PE positive; non-advisory 6, 8 and 10 are negative.
    assert!(markdown.contains("Correct diagnoses: **6 / 10** (60.0%)"));
    assert!(markdown.contains("Average decision time (all cases): **2.0 seconds**"));
    assert!(markdown.contains("| With AI assistance | 5 | 60.0% | 8.0 | 2.0 |"));
    assert!(markdown.contains("| Without AI assistance | 5 | 60.0% | 4.0 | 2.0 |"));
    assert!(markdown.contains("*Generated by demos at 2023-11-14 22:13:20 UTC (seed 77)*"));

    let case_rows = markdown
        .lines()
        .filter(|l| l.starts_with("| ") && (l.ends_with(" | Yes |") || l.ends_with(" | No |")))
        .count();
    assert_eq!(case_rows, 10);
}

#[test]
fn test_json_report_round_trip() {
    let flow = completed_flow();
    let report = report_for(&flow);

    let json = JsonGenerator::new(&report)
        .generate_pretty()
        .expect("serializes");
    let back: Report = serde_json::from_str(&json).expect("deserializes");

    assert_eq!(back, report);
    assert_eq!(back.summary.overall.correct, 6);
}

#[test]
fn test_json_report_null_for_empty_partition() {
    let flow = completed_flow();
    let advisory_only: Vec<_> = flow
        .session()
        .responses()
        .iter()
        .filter(|r| r.has_advisory)
        .cloned()
        .collect();
    let report = Report::from_responses(&advisory_only, None);

    let value: serde_json::Value = serde_json::from_str(
        &JsonGenerator::new(&report).generate().expect("serializes"),
    )
    .expect("valid json");

    assert!(value["summary"]["withoutAdvisory"]["accuracy"].is_null());
    assert!(value.get("seed").is_none());

    let markdown = MarkdownGenerator::new(&report).generate();
    assert!(markdown.contains("| Without AI assistance | 0 | — | — | — |"));
}

#[test]
fn test_report_files_written_to_directory() {
    let flow = completed_flow();
    let report = report_for(&flow);
    let dir = std::env::temp_dir().join("demos_integration_reports");
    std::fs::create_dir_all(&dir).expect("create temp dir");

    let json_path = dir.join("rct-report.json");
    JsonGenerator::new(&report)
        .write_to_file(&json_path, false)
        .expect("write json");

    let contents = std::fs::read_to_string(&json_path).expect("read json");
    assert!(!contents.contains('\n'));
    assert!(contents.contains(r#""seed":77"#));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_report_requires_summary() {
    let flow = completed_flow();
    let err = Report::builder()
        .title("Analysis Results (Demo)")
        .responses(flow.session().responses().to_vec())
        .build()
        .unwrap_err();

    assert!(matches!(err, ReportError::InvalidData(_)));
}
