//! Demos Core
//!
//! State machine, response aggregation and fixed catalogs for the portfolio
//! demos: the AI-assisted radiology RCT, the reader study arm overview and the
//! just transition dashboard.
//!
//! The RCT flow is a pure function, [`transition`], wrapped by [`DemoFlow`],
//! which supplies the shuffled case order and the clock.

pub mod aggregate;
pub mod arms;
pub mod case;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod flow;
pub mod session;
pub mod transition;

pub use aggregate::{GroupStats, Metric, Summary, NOT_AVAILABLE_GLYPH};
pub use arms::{Arm, ArmKey, ArmKpi, ArmOverview, ARMS_TITLE, PSEUDOCODE};
pub use case::{default_cases, Case, CaseId, Diagnosis, Sex, MISSING_ADVISORY_LABEL};
pub use clock::{fixed_now, Clock, FIXED_TEST_TIMESTAMP};
pub use config::{Config, CONFIG_FILE_NAME};
pub use dashboard::{
    format_thousands, Dashboard, KpiCard, Scenario, ScenarioKey, DASHBOARD_TITLE,
};
pub use error::{DemoError, Result};
pub use flow::DemoFlow;
pub use session::{Confidence, Response, Session, SessionProgress, Stage};
pub use transition::{transition, Event, Outcome, TransitionResult};
