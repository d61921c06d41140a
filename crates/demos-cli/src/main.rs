//! Demos CLI
//!
//! Terminal front end for the portfolio demos: the interactive radiology RCT,
//! the reader study arm overview and the just transition scenario dashboard.

mod runner;

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use demos_core::{
    ArmKey, ArmOverview, Config, Dashboard, DemoFlow, ScenarioKey, ARMS_TITLE, DASHBOARD_TITLE,
};
use tracing_subscriber::EnvFilter;

use crate::runner::Runner;

/// Portfolio demos
///
/// Runs the AI-assisted radiology RCT demo in the terminal, or prints the
/// study arm overview or the social protection scenario dashboard.
#[derive(Parser, Debug)]
#[command(name = "demos")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: demos.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the radiology RCT demo interactively
    Rct {
        /// Seed for the case shuffle (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory for reports
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<String>,

        /// Write rct-report.md and rct-report.json when results are viewed
        #[arg(long)]
        write_report: bool,
    },

    /// Show the reader study arm overview
    Arms {
        /// Arm to select: control, ai or ai_adaptive
        #[arg(short, long)]
        arm: Option<ArmKey>,

        /// Open the orchestrator pseudocode panel
        #[arg(long)]
        pseudocode: bool,

        /// Print the arm as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the scenario dashboard
    Dashboard {
        /// Scenario to select: baseline or transition
        #[arg(short, long)]
        scenario: Option<ScenarioKey>,

        /// Print the scenario and KPI cards as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout carries the interactive prompt, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    tracing::debug!(config = ?args.config, "Config file");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Rct {
            seed,
            output_dir,
            write_report,
        } => {
            if seed.is_some() {
                config.seed = seed;
            }
            if let Some(ref output_dir) = output_dir {
                config.output_dir.clone_from(output_dir);
            }
            config.write_report |= write_report;

            // Re-validate after overrides
            config.validate()?;
            run_rct(&config)
        }
        Command::Arms {
            arm,
            pseudocode,
            json,
        } => {
            let mut overview = ArmOverview::new(arm.unwrap_or_default());
            overview.set_pseudocode(pseudocode);
            show_arms(&overview, json)
        }
        Command::Dashboard { scenario, json } => {
            let key = scenario.unwrap_or(config.default_scenario);
            show_dashboard(key, json)
        }
    }
}

fn run_rct(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        cases = config.cases.len(),
        seed = ?config.seed,
        write_report = config.write_report,
        "Starting radiology RCT demo"
    );

    let flow = DemoFlow::from_config(config);
    let stdin = io::stdin();
    let stdout = io::stdout();

    let mut runner = Runner::new(flow, stdin.lock(), stdout.lock());
    if config.write_report {
        runner = runner.with_report_dir(&config.output_dir);
    }
    runner.run()?;

    let session = runner.flow().session();
    tracing::debug!(
        stage = %session.stage(),
        responses = session.responses().len(),
        "Session ended"
    );
    Ok(())
}

fn show_dashboard(key: ScenarioKey, json: bool) -> anyhow::Result<()> {
    let dashboard = Dashboard::new(key);
    let scenario = dashboard.scenario();
    let kpis = dashboard.kpis();
    let mut out = io::stdout().lock();

    if json {
        let value = serde_json::json!({
            "scenario": scenario,
            "kpis": kpis,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    writeln!(out, "{DASHBOARD_TITLE}")?;
    writeln!(out)?;
    writeln!(out, "Scenario: {}", scenario.option_label)?;
    writeln!(out, "{}", scenario.caption())?;
    writeln!(out)?;
    for kpi in &kpis {
        writeln!(out, "{:<20} {:>10}  {}", kpi.title, kpi.value, kpi.caption)?;
    }
    Ok(())
}

fn show_arms(overview: &ArmOverview, json: bool) -> anyhow::Result<()> {
    let arm = overview.arm();
    let mut out = io::stdout().lock();

    if json {
        let value = serde_json::json!({
            "arm": arm,
            "pseudocode": overview.pseudocode(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    writeln!(out, "{ARMS_TITLE}")?;
    writeln!(out)?;
    writeln!(out, "{}", arm.title)?;
    writeln!(out, "Intent: {}", arm.intent)?;
    writeln!(out, "Mechanism: {}", arm.mechanism)?;
    writeln!(out)?;
    for kpi in &arm.kpis {
        match kpi.note {
            Some(note) => writeln!(out, "{:<32} {:>6}  {note}", kpi.label, kpi.display_value())?,
            None => writeln!(out, "{:<32} {:>6}", kpi.label, kpi.display_value())?,
        }
    }
    writeln!(out)?;
    writeln!(out, "Notes: {}", arm.notes)?;

    if let Some(code) = overview.pseudocode() {
        writeln!(out)?;
        writeln!(out, "Orchestrator pseudocode")?;
        writeln!(out, "{code}")?;
    }
    Ok(())
}

/// Loads configuration from the specified path or the current directory.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}
