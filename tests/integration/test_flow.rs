//! End-to-end tests for the radiology RCT flow.
//!
//! These drive `DemoFlow` through complete runs with a fixed clock and a
//! seeded shuffle, and check the properties that must hold for any run.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::Duration;
use demos_core::{
    default_cases, fixed_now, transition, CaseId, Clock, Config, DemoFlow, Diagnosis, Event,
    Metric, Outcome, ScenarioKey, Session, Stage,
};

/// Path to the fixture directory.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn seeded_flow(seed: u64) -> DemoFlow {
    DemoFlow::with_seed(default_cases(), seed).with_clock(Clock::fixed(fixed_now()))
}

fn sequence_ids(flow: &DemoFlow) -> Vec<CaseId> {
    flow.session().sequence().iter().map(|c| c.id).collect()
}

/// Answers every remaining case, choosing the decision with `decide`.
fn answer_remaining(flow: &mut DemoFlow, decide: impl Fn(Diagnosis) -> Diagnosis) {
    while let Some(truth) = flow.session().current_case().map(|c| c.truth) {
        let before = flow.session().responses().len();
        assert!(before < flow.session().sequence().len());

        flow.set_decision(decide(truth));
        flow.set_confidence(6).expect("confidence in range");
        flow.clock_mut().advance(Duration::milliseconds(1_200));
        assert_eq!(flow.advance(), Outcome::Applied);
        assert_eq!(flow.session().responses().len(), before + 1);
    }
}

#[test]
fn test_complete_run_records_every_case() {
    let mut flow = seeded_flow(17);
    flow.start();
    answer_remaining(&mut flow, |truth| truth);

    let session = flow.session();
    assert_eq!(session.stage(), Stage::PostExperiment);
    assert_eq!(session.responses().len(), 10);
    assert!(session.case_started_at().is_none());

    let answered: HashSet<CaseId> = session.responses().iter().map(|r| r.case_id).collect();
    assert_eq!(answered.len(), 10, "each case answered exactly once");
}

#[test]
fn test_response_order_matches_shuffled_sequence() {
    let mut flow = seeded_flow(99);
    flow.start();
    let shown = sequence_ids(&flow);
    answer_remaining(&mut flow, |truth| truth);

    let recorded: Vec<CaseId> = flow.session().responses().iter().map(|r| r.case_id).collect();
    assert_eq!(recorded, shown);
}

#[test]
fn test_summary_after_all_wrong_answers() {
    let mut flow = seeded_flow(3);
    flow.start();
    answer_remaining(&mut flow, |truth| match truth {
        Diagnosis::Yes => Diagnosis::No,
        Diagnosis::No => Diagnosis::Yes,
    });
    flow.view_results();

    let summary = flow.summary().expect("summary available in results");
    assert_eq!(summary.correct_total(), 0);
    assert_eq!(summary.overall.accuracy, Metric::Value(0.0));
    assert_eq!(summary.with_advisory.count, 5);
    assert_eq!(summary.without_advisory.count, 5);
    assert_eq!(summary.overall.avg_time_secs(), Metric::Value(1.2));
}

#[test]
fn test_results_only_after_post_experiment() {
    let mut flow = seeded_flow(5);
    assert_eq!(flow.view_results(), Outcome::Ignored);

    flow.start();
    assert_eq!(flow.view_results(), Outcome::Ignored);
    assert_eq!(flow.session().stage(), Stage::Experiment);

    answer_remaining(&mut flow, |_| Diagnosis::Yes);
    assert_eq!(flow.view_results(), Outcome::Applied);

    // Results is terminal apart from exit.
    assert_eq!(flow.start(), Outcome::Ignored);
    assert_eq!(flow.set_decision(Diagnosis::No), Outcome::Ignored);
    assert_eq!(flow.session().stage(), Stage::Results);
}

#[test]
fn test_exit_from_each_stage_resets() {
    let mut flow = seeded_flow(8);

    flow.start();
    flow.set_decision(Diagnosis::Yes);
    flow.advance();
    flow.exit();
    assert_eq!(flow.session(), &Session::default());

    flow.start();
    answer_remaining(&mut flow, |truth| truth);
    flow.exit();
    assert_eq!(flow.session(), &Session::default());

    flow.start();
    answer_remaining(&mut flow, |truth| truth);
    flow.view_results();
    flow.exit();
    assert_eq!(flow.session(), &Session::default());
    assert!(flow.summary().is_none());
}

#[test]
fn test_restart_draws_new_permutation() {
    let mut flow = seeded_flow(2024);
    let table: HashSet<CaseId> = default_cases().iter().map(|c| c.id).collect();

    let mut orders = Vec::new();
    for _ in 0..5 {
        flow.start();
        let ids = sequence_ids(&flow);
        assert_eq!(ids.iter().copied().collect::<HashSet<_>>(), table);
        orders.push(ids);
        flow.exit();
    }

    let distinct: HashSet<&Vec<CaseId>> = orders.iter().collect();
    assert!(distinct.len() > 1, "five restarts should not all share one order");
}

#[test]
fn test_pure_transition_matches_controller() {
    let mut flow = seeded_flow(12);
    flow.start();
    let sequence = flow.session().sequence().to_vec();

    let session = transition(
        Session::default(),
        Event::Start {
            sequence,
            at: fixed_now(),
        },
    )
    .session;

    assert_eq!(&session, flow.session());
}

#[test]
fn test_fixture_config_drives_flow() {
    let config = Config::load_from_file(&fixture_path().join("demos.json"))
        .expect("fixture config loads");

    assert_eq!(config.seed, Some(2024));
    assert_eq!(config.output_dir, "reports");
    assert!(config.write_report);
    assert_eq!(config.default_scenario, ScenarioKey::Transition);
    assert_eq!(config.cases.len(), 4);

    let mut flow = DemoFlow::from_config(&config).with_clock(Clock::fixed(fixed_now()));
    flow.start();
    assert_eq!(flow.session().sequence().len(), 4);

    answer_remaining(&mut flow, |truth| truth);
    flow.view_results();

    let summary = flow.summary().expect("summary");
    assert_eq!(summary.total(), 4);
    assert_eq!(summary.with_advisory.count, 3);
    assert_eq!(summary.without_advisory.count, 1);
    assert_eq!(summary.overall.accuracy, Metric::Value(100.0));
}

#[test]
fn test_fixture_case_without_label_shows_placeholder() {
    let config = Config::load_from_file(&fixture_path().join("demos.json"))
        .expect("fixture config loads");
    let case = config
        .cases
        .iter()
        .find(|c| c.id == CaseId::new(3))
        .expect("case 3 in fixture");

    assert_eq!(case.advisory_text(), Some("N/A"));
}
