//! Configuration settings for the logic-grid solver

use crate::logic::EngineOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub engine: EngineConfig,
    pub display: DisplayConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Check clues against candidates on all cores
    pub parallel_evaluation: bool,
    /// Refuse puzzles whose initial candidate pool is larger than this
    pub max_candidates: usize,
}

impl EngineConfig {
    pub fn options(&self) -> EngineOptions {
        EngineOptions {
            parallel_evaluation: self.parallel_evaluation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub views: Vec<ViewKind>,
    pub use_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Grid,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub puzzle_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    #[serde(default)]
    pub output_directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: EngineConfig {
                parallel_evaluation: false,
                max_candidates: 2_000_000,
            },
            display: DisplayConfig {
                views: vec![ViewKind::Grid, ViewKind::Summary],
                use_color: true,
            },
            input: InputConfig {
                puzzle_file: PathBuf::from("puzzles/pet_owners.yaml"),
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                output_directory: None,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.engine.max_candidates == 0 {
            anyhow::bail!("Maximum candidate count must be positive");
        }

        if self.display.views.is_empty() {
            anyhow::bail!("At least one view must be configured");
        }

        Ok(())
    }

    /// Check that the configured puzzle file is present
    pub fn validate_input(&self) -> Result<()> {
        if !self.input.puzzle_file.exists() {
            anyhow::bail!(
                "Puzzle file does not exist: {}",
                self.input.puzzle_file.display()
            );
        }
        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref puzzle_file) = cli_overrides.puzzle_file {
            self.input.puzzle_file = puzzle_file.clone();
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = Some(output_dir.clone());
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if let Some(parallel) = cli_overrides.parallel {
            self.engine.parallel_evaluation = parallel;
        }
        if let Some(max_candidates) = cli_overrides.max_candidates {
            self.engine.max_candidates = max_candidates;
        }
        if cli_overrides.no_color {
            self.display.use_color = false;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub puzzle_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub parallel: Option<bool>,
    pub max_candidates: Option<usize>,
    pub no_color: bool,
}
