//! Evaluation processors.

pub mod aggregation;
pub mod evaluation;
pub mod pipeline;

// Re-export key types for convenience
pub use aggregation::{
    group_by_reference, summarize, AggregationError, DirectorySummary, ReferenceGroup,
    SpreadStats, StreamSummary, SummaryStats,
};
pub use evaluation::{
    evaluate_log, evaluate_samples, evaluate_stream, EvaluationError, FileResult, MeanStd,
    PerAxis, PlanarSpatial, Stream, StreamResult,
};
pub use pipeline::{evaluate_directory, evaluate_file, DirectoryEvaluation, PipelineError};
