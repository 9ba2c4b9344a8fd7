//! Accuracy, precision and jitter evaluation for paired UWB position logs.
//!
//! This crate provides tools for:
//! - Parsing reference-point measurement logs (raw and filtered positions)
//! - Per-file accuracy, precision and frame-to-frame jitter metrics
//! - Directory-wide mean/median/std reduction grouped by reference position
//! - Console reports and scatter plots of reference positions vs centroids
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use uwb_eval::{processors::pipeline::evaluate_directory, report::render_report, EvalConfig};
//!
//! let config = EvalConfig::default();
//! let evaluation = evaluate_directory(Path::new("measurements"), &config).unwrap();
//! println!("{}", render_report(&evaluation.summary, &config.report));
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;
pub mod report;
pub mod visualization;

pub use crate::config::{EvalConfig, InputConfig, PlotConfig, ProcessingConfig, ReportConfig};
pub use crate::core::geometry::Coordinate;
pub use crate::core::loaders::{MeasurementLog, Sample};
pub use crate::processors::aggregation::DirectorySummary;
pub use crate::processors::evaluation::{FileResult, Stream};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
