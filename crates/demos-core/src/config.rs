//! Configuration for the demos.
//!
//! Settings come from an optional `demos.json` in the working directory (or a
//! path given on the command line). Every key is optional; missing keys fall
//! back to the built-in defaults and unknown keys are ignored.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::case::{default_cases, Case};
use crate::dashboard::ScenarioKey;
use crate::error::{DemoError, Result};

/// The default config file name.
pub const CONFIG_FILE_NAME: &str = "demos.json";

/// Default output directory for reports.
fn default_output_dir() -> String {
    ".".to_string()
}

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Case table used by the RCT demo.
    #[serde(default = "default_cases")]
    pub cases: Vec<Case>,

    /// Seed for the case shuffle. `None` draws a fresh seed each run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Output directory for generated reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Write the results report when the results view is reached.
    #[serde(default)]
    pub write_report: bool,

    /// Scenario selected when the dashboard opens.
    #[serde(default)]
    pub default_scenario: ScenarioKey,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cases: default_cases(),
            seed: None,
            output_dir: default_output_dir(),
            write_report: false,
            default_scenario: ScenarioKey::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `demos.json` exists but cannot be read, parsed or
    /// validated.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            DemoError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads `demos.json` from `dir`, or the defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load_from_file`].
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `DemoError::ConfigParseError` if the file cannot be read or is
    /// not valid JSON, and `DemoError::ConfigValidationError` if the values
    /// fail [`Config::validate`].
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(DemoError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| DemoError::config_parse(path, e.to_string()))?;
        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            cases = config.cases.len(),
            seeded = config.seed.is_some(),
            "Loaded config"
        );
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// - `cases` must not be empty
    /// - case ids must be unique
    /// - `output_dir` must not be empty
    ///
    /// # Errors
    ///
    /// Returns `DemoError::ConfigValidationError` describing the first failure.
    pub fn validate(&self) -> Result<()> {
        if self.cases.is_empty() {
            return Err(DemoError::config_validation(
                "cases must not be empty",
                "Remove the cases key from your demos.json to use the built-in cases",
            ));
        }

        let mut seen = HashSet::with_capacity(self.cases.len());
        if let Some(dup) = self.cases.iter().find(|c| !seen.insert(c.id)) {
            return Err(DemoError::config_validation(
                format!("duplicate case id {}", dup.id),
                "Give every case in your demos.json a unique id",
            ));
        }

        if self.output_dir.trim().is_empty() {
            return Err(DemoError::config_validation(
                "outputDir must not be empty",
                "Provide a valid output directory path in your demos.json (use '.' for current directory)",
            ));
        }

        Ok(())
    }
}
