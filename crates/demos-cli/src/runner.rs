//! Interactive terminal front end for the radiology RCT demo.
//!
//! Reads one command per line, maps it to a [`DemoFlow`] action and redraws
//! the current view whenever the session changes. Generic over the input and
//! output streams so whole sessions can be scripted in tests.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use demos_core::{Case, DemoFlow, Diagnosis, Outcome, Session, Stage};
use demos_report::json::JsonGenerator;
use demos_report::{MarkdownGenerator, Report, JSON_FILE_NAME, MARKDOWN_FILE_NAME};

/// Shown when the user tries to advance without a decision.
pub const DECISION_HINT: &str = "Select Yes or No to continue.";

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Begin the demo.
    Start,
    /// Leave the program.
    Quit,
    /// Select yes/no.
    Decision(Diagnosis),
    /// Move the confidence slider.
    Confidence(u32),
    /// Submit the displayed case.
    Next,
    /// Show the results.
    Results,
    /// Return to the intro.
    Exit,
}

impl Command {
    /// Parses a line of input, case-insensitively.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let word = line.trim().to_lowercase();
        if let Some(decision) = Diagnosis::from_str_case_insensitive(&word) {
            return Some(Self::Decision(decision));
        }
        if let Ok(value) = word.parse::<u32>() {
            return Some(Self::Confidence(value));
        }
        match word.as_str() {
            "start" => Some(Self::Start),
            "quit" | "q" => Some(Self::Quit),
            "next" | "finish" => Some(Self::Next),
            "results" => Some(Self::Results),
            "exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Drives a [`DemoFlow`] from a line-based input stream.
pub struct Runner<R, W> {
    flow: DemoFlow,
    input: R,
    output: W,
    report_dir: Option<PathBuf>,
}

impl<R: BufRead, W: Write> Runner<R, W> {
    /// Creates a runner over the given streams.
    pub const fn new(flow: DemoFlow, input: R, output: W) -> Self {
        Self {
            flow,
            input,
            output,
            report_dir: None,
        }
    }

    /// Writes `rct-report.md` and `rct-report.json` into `dir` whenever the
    /// results view is reached.
    #[must_use]
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = Some(dir.into());
        self
    }

    /// The flow being driven.
    pub const fn flow(&self) -> &DemoFlow {
        &self.flow
    }

    /// Runs until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input, writing output or writing a report
    /// fails.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.render()?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                tracing::debug!("End of input");
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            let stage = self.flow.session().stage();
            let Some(command) = Command::parse(&line) else {
                self.print_hint(stage)?;
                continue;
            };
            tracing::debug!(stage = %stage, command = ?command, "Input");

            if stage == Stage::Intro && command == Command::Quit {
                break;
            }

            if self.handle(stage, command)? == Outcome::Applied {
                self.render()?;
            }
        }

        Ok(())
    }

    /// Applies a command to the flow. Commands that do not belong to the
    /// stage only print the hint.
    fn handle(&mut self, stage: Stage, command: Command) -> anyhow::Result<Outcome> {
        let outcome = match (stage, command) {
            (Stage::Intro, Command::Start) => self.flow.start(),

            (Stage::Experiment, Command::Decision(decision)) => self.flow.set_decision(decision),
            (Stage::Experiment, Command::Confidence(value)) => {
                match self.flow.set_confidence(value) {
                    Ok(outcome) => outcome,
                    Err(e) if e.is_input_error() => {
                        writeln!(self.output, "{e}")?;
                        Outcome::Ignored
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            (Stage::Experiment, Command::Next) => {
                if !self.flow.session().can_advance() {
                    writeln!(self.output, "{DECISION_HINT}")?;
                    return Ok(Outcome::Ignored);
                }
                self.flow.advance()
            }

            (Stage::PostExperiment, Command::Results) => {
                let outcome = self.flow.view_results();
                if outcome == Outcome::Applied {
                    self.write_reports()?;
                }
                outcome
            }

            (Stage::Experiment | Stage::PostExperiment | Stage::Results, Command::Exit) => {
                self.flow.exit()
            }

            _ => {
                self.print_hint(stage)?;
                Outcome::Ignored
            }
        };
        Ok(outcome)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    fn render(&mut self) -> anyhow::Result<()> {
        let session = self.flow.session();
        match session.stage() {
            Stage::Intro => render_intro(&mut self.output, self.flow.cases())?,
            Stage::Experiment => render_case(&mut self.output, session)?,
            Stage::PostExperiment => render_post_experiment(&mut self.output)?,
            Stage::Results => {
                let report = self.report();
                write!(self.output, "{}", MarkdownGenerator::new(&report).generate())?;
                writeln!(self.output, "Type 'exit' to return to the intro.")?;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn print_hint(&mut self, stage: Stage) -> anyhow::Result<()> {
        let hint = match stage {
            Stage::Intro => "Type 'start' to begin or 'quit' to leave.",
            Stage::Experiment => "Commands: yes, no, 0-10 (confidence), next, exit.",
            Stage::PostExperiment => "Type 'results' to view the analysis or 'exit' to leave.",
            Stage::Results => "Type 'exit' to return to the intro.",
        };
        writeln!(self.output, "{hint}")?;
        Ok(())
    }

    // ========================================================================
    // Reports
    // ========================================================================

    fn report(&self) -> Report {
        Report::from_responses(self.flow.session().responses(), self.flow.seed())
    }

    fn write_reports(&mut self) -> anyhow::Result<()> {
        let Some(dir) = self.report_dir.clone() else {
            return Ok(());
        };
        let report = self.report();
        let (md_path, json_path) = write_report_files(&report, &dir)?;
        writeln!(self.output, "Markdown report: {}", md_path.display())?;
        writeln!(self.output, "JSON report: {}", json_path.display())?;
        Ok(())
    }
}

/// Writes the Markdown and JSON reports into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// written.
pub fn write_report_files(report: &Report, dir: &Path) -> anyhow::Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create output directory: {e}\n\nPath: {}",
            dir.display()
        )
    })?;

    let md_path = dir.join(MARKDOWN_FILE_NAME);
    std::fs::write(&md_path, MarkdownGenerator::new(report).generate())?;

    let json_path = dir.join(JSON_FILE_NAME);
    JsonGenerator::new(report).write_to_file(&json_path, true)?;

    tracing::info!(
        markdown = %md_path.display(),
        json = %json_path.display(),
        responses = report.responses.len(),
        "Reports written"
    );
    Ok((md_path, json_path))
}

fn render_intro(out: &mut impl Write, cases: &[Case]) -> std::io::Result<()> {
    let total = cases.len();
    let advisory = cases.iter().filter(|c| c.has_advisory).count();

    writeln!(out, "AI-Assisted Radiology RCT Demo")?;
    writeln!(out, "==============================")?;
    writeln!(out)?;
    writeln!(
        out,
        "You will see {total} CT lung cases, one at a time, in a random order each run."
    )?;
    writeln!(
        out,
        "In {advisory} of the {total} cases an AI assistant panel shows a suggested PE assessment."
    )?;
    writeln!(
        out,
        "For every case, enter a PE diagnosis (yes/no) and a confidence from 0 to 10."
    )?;
    writeln!(out, "The time each case is on screen is recorded.")?;
    writeln!(out)?;
    writeln!(
        out,
        "This is a research demo. It is not a medical tool and does not provide clinical advice."
    )?;
    writeln!(out)?;
    writeln!(out, "Type 'start' to begin or 'quit' to leave.")
}

fn render_case(out: &mut impl Write, session: &Session) -> std::io::Result<()> {
    let Some(case) = session.current_case() else {
        return Ok(());
    };

    writeln!(out)?;
    writeln!(
        out,
        "Case {} of {}",
        session.current_index() + 1,
        session.sequence().len()
    )?;
    writeln!(out, "[CT image for case {} (placeholder)]", case.id)?;
    writeln!(out, "Patient: {} years, {}", case.age, case.sex)?;
    if let Some(suggestion) = case.advisory_text() {
        writeln!(out, "AI assistant (demo): suggested assessment: {suggestion}")?;
    }
    writeln!(
        out,
        "Is pulmonary embolism (PE) present? [yes/no]  Confidence [0-10]: {}",
        session.confidence()
    )?;
    let action = if session.is_last_case() {
        "finish"
    } else {
        "next case"
    };
    writeln!(out, "Type 'next' to submit ({action}), 'exit' to leave.")
}

fn render_post_experiment(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "You have reached the end of the diagnostic task. In a real randomized controlled"
    )?;
    writeln!(
        out,
        "trial, participants would typically exit the study at this point without seeing"
    )?;
    writeln!(out, "their detailed performance metrics.")?;
    writeln!(out)?;
    writeln!(
        out,
        "Type 'results' to view the analysis (demo only) or 'exit' to leave."
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::io::Cursor;

    use demos_core::{default_cases, fixed_now, CaseId, Clock};

    use super::*;

    fn runner(script: &str) -> Runner<Cursor<String>, Vec<u8>> {
        let flow = DemoFlow::with_seed(default_cases(), 42).with_clock(Clock::fixed(fixed_now()));
        Runner::new(flow, Cursor::new(script.to_string()), Vec::new())
    }

    fn output(runner: &Runner<Cursor<String>, Vec<u8>>) -> String {
        String::from_utf8(runner.output.clone()).unwrap()
    }

    /// Answers all ten cases with "yes" and confidence 5.
    fn answer_all() -> String {
        "yes\n5\nnext\n".repeat(10)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("START"), Some(Command::Start));
        assert_eq!(Command::parse(" y "), Some(Command::Decision(Diagnosis::Yes)));
        assert_eq!(Command::parse("No"), Some(Command::Decision(Diagnosis::No)));
        assert_eq!(Command::parse("7"), Some(Command::Confidence(7)));
        assert_eq!(Command::parse("42"), Some(Command::Confidence(42)));
        assert_eq!(Command::parse("finish"), Some(Command::Next));
        assert_eq!(Command::parse("results"), Some(Command::Results));
        assert_eq!(Command::parse("maybe"), None);
        assert_eq!(Command::parse("-1"), None);
    }

    #[test]
    fn test_intro_then_quit() {
        let mut r = runner("quit\nstart\n");
        r.run().unwrap();

        assert_eq!(r.flow().session().stage(), Stage::Intro);
        let out = output(&r);
        assert!(out.contains("AI-Assisted Radiology RCT Demo"));
        assert!(out.contains("In 5 of the 10 cases"));
    }

    #[test]
    fn test_intro_counts_follow_case_table() {
        let cases: Vec<Case> = default_cases()
            .into_iter()
            .filter(|c| c.id != CaseId::new(2) && c.id != CaseId::new(4))
            .collect();
        let advisory = cases.iter().filter(|c| c.has_advisory).count();
        let flow = DemoFlow::with_seed(cases, 42).with_clock(Clock::fixed(fixed_now()));
        let mut r = Runner::new(flow, Cursor::new(String::new()), Vec::new());
        r.run().unwrap();

        let out = output(&r);
        assert!(out.contains("You will see 8 CT lung cases"));
        assert!(out.contains(&format!("In {advisory} of the 8 cases")));
        assert!(!out.contains("of the 10 cases"));
    }

    #[test]
    fn test_scripted_session_reaches_results() {
        let script = format!("start\n{}results\n", answer_all());
        let mut r = runner(&script);
        r.run().unwrap();

        let session = r.flow().session();
        assert_eq!(session.stage(), Stage::Results);
        assert_eq!(session.responses().len(), 10);

        let out = output(&r);
        assert!(out.contains("Case 1 of 10"));
        assert!(out.contains("Case 10 of 10"));
        assert!(out.contains("You have reached the end of the diagnostic task."));
        assert!(out.contains("Correct diagnoses: **5 / 10** (50.0%)"));
        assert!(out.contains("| With AI assistance | 5 | 60.0% | 5.0 |"));
        assert!(out.contains("| Without AI assistance | 5 | 40.0% | 5.0 |"));
    }

    #[test]
    fn test_next_without_decision_prints_hint() {
        let mut r = runner("start\nnext\n");
        r.run().unwrap();

        let session = r.flow().session();
        assert_eq!(session.stage(), Stage::Experiment);
        assert_eq!(session.current_index(), 0);
        assert!(session.responses().is_empty());
        assert!(output(&r).contains(DECISION_HINT));
    }

    #[test]
    fn test_out_of_range_confidence_is_reported() {
        let mut r = runner("start\n11\n");
        r.run().unwrap();

        assert_eq!(r.flow().session().confidence().value(), 0);
        assert!(output(&r).contains("Confidence must be between 0 and 10, got 11"));
    }

    #[test]
    fn test_unknown_input_prints_stage_hint() {
        let mut r = runner("hello\nstart\nresults\n");
        r.run().unwrap();

        let out = output(&r);
        assert!(out.contains("Type 'start' to begin or 'quit' to leave."));
        assert!(out.contains("Commands: yes, no, 0-10 (confidence), next, exit."));
        assert_eq!(r.flow().session().stage(), Stage::Experiment);
    }

    #[test]
    fn test_exit_mid_run_returns_to_intro() {
        let mut r = runner("start\nyes\nnext\nexit\n");
        r.run().unwrap();

        let session = r.flow().session();
        assert_eq!(session.stage(), Stage::Intro);
        assert!(session.responses().is_empty());
    }

    #[test]
    fn test_results_write_reports() {
        let dir = std::env::temp_dir().join("test_demos_runner_reports");
        let script = format!("start\n{}results\nexit\n", answer_all());
        let mut r = runner(&script).with_report_dir(&dir);
        r.run().unwrap();

        let markdown = std::fs::read_to_string(dir.join(MARKDOWN_FILE_NAME)).unwrap();
        assert!(markdown.contains("## With vs. without AI assistance"));
        assert!(markdown.contains("(seed 42)"));

        let json = std::fs::read_to_string(dir.join(JSON_FILE_NAME)).unwrap();
        let report: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(report.responses.len(), 10);
        assert_eq!(report.seed, Some(42));

        assert_eq!(r.flow().session().stage(), Stage::Intro);

        std::fs::remove_dir_all(&dir).ok();
    }
}
