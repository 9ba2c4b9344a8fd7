//! Directory evaluation: discover logs, evaluate each file, aggregate.
//!
//! Per-file work is independent, so it is mapped over rayon's thread pool
//! when enabled. The reduction runs on the collected results in file order.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;

use super::aggregation::{self, AggregationError, DirectorySummary};
use super::evaluation::{self, EvaluationError, FileResult};
use crate::config::EvalConfig;
use crate::core::loaders::{self, LoaderError};

/// Errors that abort a directory evaluation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to list directory '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No .{extension} measurement files found in {directory}")]
    NoInputFiles {
        directory: PathBuf,
        extension: String,
    },

    #[error(transparent)]
    Load(#[from] LoaderError),

    #[error("Failed to evaluate '{path}': {source}")]
    Evaluation {
        path: PathBuf,
        #[source]
        source: EvaluationError,
    },

    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Per-file results together with their directory summary.
#[derive(Debug, Clone)]
pub struct DirectoryEvaluation {
    pub directory: PathBuf,
    /// File results in sorted path order.
    pub files: Vec<FileResult>,
    pub summary: DirectorySummary,
}

/// Load and evaluate a single log file.
pub fn evaluate_file(path: &Path) -> Result<FileResult> {
    let log = loaders::load_measurement_log(path)?;
    log::debug!("{}: {} samples", log.file_name(), log.len());

    evaluation::evaluate_log(&log).map_err(|source| PipelineError::Evaluation {
        path: path.to_path_buf(),
        source,
    })
}

/// Evaluate every file in `paths`.
///
/// On failure the error of the first failing file in path order is returned,
/// in both parallel and sequential mode.
pub fn evaluate_files(paths: &[PathBuf], parallel: bool) -> Result<Vec<FileResult>> {
    if parallel {
        let results: Vec<Result<FileResult>> = paths.par_iter().map(|p| evaluate_file(p)).collect();
        results.into_iter().collect()
    } else {
        paths.iter().map(|p| evaluate_file(p)).collect()
    }
}

/// Evaluate all measurement logs in a directory.
///
/// # Errors
///
/// Fails with `NoInputFiles` before any computation when the directory holds
/// no matching files, and with the first load or evaluation error otherwise.
pub fn evaluate_directory(directory: &Path, config: &EvalConfig) -> Result<DirectoryEvaluation> {
    if !directory.is_dir() {
        return Err(PipelineError::DirectoryNotFound(directory.to_path_buf()));
    }

    let extension = config.input.extension.trim_start_matches('.');
    let paths = loaders::find_log_files(directory, extension).map_err(|source| PipelineError::Io {
        path: directory.to_path_buf(),
        source,
    })?;

    if paths.is_empty() {
        return Err(PipelineError::NoInputFiles {
            directory: directory.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    log::info!("Found {} measurement files in {}", paths.len(), directory.display());

    let files = evaluate_files(&paths, config.processing.parallel)?;
    let summary = aggregation::summarize(&files)?;

    log::info!(
        "Evaluated {} samples across {} reference positions",
        summary.sample_count,
        summary.groups.len()
    );

    Ok(DirectoryEvaluation {
        directory: directory.to_path_buf(),
        files,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_log(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    #[test]
    fn test_evaluate_directory_empty() {
        let temp_dir = TempDir::new().unwrap();
        write_log(temp_dir.path(), "readme.md", &["not a log"]);

        let err = evaluate_directory(temp_dir.path(), &EvalConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::NoInputFiles { .. }));
    }

    #[test]
    fn test_evaluate_directory_missing() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let err = evaluate_directory(&missing, &EvalConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_evaluate_directory_sequential_and_parallel_agree() {
        let temp_dir = TempDir::new().unwrap();
        write_log(
            temp_dir.path(),
            "north(0_0_0).txt",
            &["0.1,0.0,0.0|0.05,0.0,0.0", "0.3,0.1,0.0|0.2,0.05,0.0", "0.0,0.2,0.1|0.1,0.1,0.05"],
        );
        write_log(
            temp_dir.path(),
            "south(0,0_0,0_0,0).txt",
            &["-0.2,0.0,0.0|-0.1,0.0,0.0", "-0.1,-0.1,0.0|-0.1,-0.05,0.0"],
        );
        write_log(
            temp_dir.path(),
            "west(2_1_0).txt",
            &["2.1,1.0,0.0|2.05,1.0,0.0", "1.9,1.2,0.0|2.0,1.1,0.0"],
        );

        let mut config = EvalConfig::default();
        config.processing.parallel = false;
        let sequential = evaluate_directory(temp_dir.path(), &config).unwrap();
        config.processing.parallel = true;
        let parallel = evaluate_directory(temp_dir.path(), &config).unwrap();

        assert_eq!(sequential.summary, parallel.summary);
        assert_eq!(sequential.files.len(), 3);
        // "0_0_0" and "0,0_0,0_0,0" parse to the same reference.
        assert_eq!(sequential.summary.groups.len(), 2);
        assert_eq!(sequential.summary.groups[0].file_count(), 2);
    }

    #[test]
    fn test_bad_file_aborts_run() {
        let temp_dir = TempDir::new().unwrap();
        write_log(temp_dir.path(), "a(0_0_0).txt", &["0,0,0|0,0,0", "1,1,1|1,1,1"]);
        write_log(temp_dir.path(), "b(0_0).txt", &["0,0,0|0,0,0", "1,1,1|1,1,1"]);

        let err = evaluate_directory(temp_dir.path(), &EvalConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Load(LoaderError::MalformedFilename { .. })
        ));
    }

    #[test]
    fn test_parallel_error_names_first_bad_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for name in ["a(0_0_0).txt", "b(0_0).txt", "c(0_0_0).txt", "d(1_1).txt", "e(0_0_0).txt"] {
            paths.push(write_log(temp_dir.path(), name, &["0,0,0|0,0,0", "1,1,1|1,1,1"]));
        }

        for _ in 0..20 {
            match evaluate_files(&paths, true) {
                Err(PipelineError::Load(LoaderError::MalformedFilename { file, .. })) => {
                    assert_eq!(file, "b(0_0).txt");
                }
                other => panic!("expected malformed filename, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_single_sample_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_log(temp_dir.path(), "a(0_0_0).txt", &["0,0,0|0,0,0"]);

        match evaluate_file(&path) {
            Err(PipelineError::Evaluation { path: p, source }) => {
                assert_eq!(p, path);
                assert!(matches!(source, EvaluationError::InsufficientSamples { found: 1, .. }));
            }
            other => panic!("expected evaluation error, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_extension() {
        let temp_dir = TempDir::new().unwrap();
        write_log(temp_dir.path(), "a(0_0_0).log", &["0,0,0|0,0,0", "1,0,0|0.5,0,0"]);
        fs::write(temp_dir.path().join("ignored(0_0_0).txt"), "garbage").unwrap();

        let mut config = EvalConfig::default();
        config.input.extension = ".log".to_string();

        let evaluation = evaluate_directory(temp_dir.path(), &config).unwrap();
        assert_eq!(evaluation.files.len(), 1);
        assert_eq!(evaluation.summary.file_count, 1);
    }
}
