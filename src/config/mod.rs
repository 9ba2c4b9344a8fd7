//! Configuration types for the evaluation pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Input discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Extension of measurement log files (case-insensitive, without dot)
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    "txt".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
        }
    }
}

/// Settings for per-file evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Evaluate files in parallel with rayon
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

/// Console report formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Decimal places for every reported value
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Unit suffix appended to each line
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_precision() -> usize {
    3
}

fn default_unit() -> String {
    "m".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            unit: default_unit(),
        }
    }
}

/// Scatter plot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Image width in pixels
    #[serde(default = "default_plot_width")]
    pub width: u32,

    /// Image height in pixels
    #[serde(default = "default_plot_height")]
    pub height: u32,

    /// Marker size in pixels
    #[serde(default = "default_point_size")]
    pub point_size: u32,

    /// Draw a legend (needs a system font)
    #[serde(default = "default_legend")]
    pub legend: bool,
}

fn default_plot_width() -> u32 {
    1280
}

fn default_plot_height() -> u32 {
    960
}

fn default_point_size() -> u32 {
    5
}

fn default_legend() -> bool {
    true
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: default_plot_width(),
            height: default_plot_height(),
            point_size: default_point_size(),
            legend: default_legend(),
        }
    }
}

/// Main configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub processing: ProcessingConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub plot: PlotConfig,
}

impl EvalConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: EvalConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
