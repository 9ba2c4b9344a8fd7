//! Per-file evaluation of paired raw/filtered position streams.
//!
//! For each stream the evaluator measures:
//! - **Accuracy**: distance of every sample to the reference position.
//! - **Precision**: distance of every sample to the stream's own centroid.
//! - **Jitter**: absolute change of distance-to-reference between
//!   consecutive samples.
//!
//! Distances are reported in 2D (x, y) and 3D, plus signed per-axis offsets.
//! Every sequence is reduced to its mean and population standard deviation.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::geometry::{axis_distance, centroid, distance_2d, distance_3d, Axis, Coordinate};
use crate::core::loaders::{MeasurementLog, Sample};
use crate::core::stats::{self, abs_consecutive_deltas, root_mean_square, StatsError};

/// Minimum number of samples per file. Jitter needs at least one pair.
pub const MIN_SAMPLES: usize = 2;

/// Errors that can occur while evaluating one file.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("insufficient samples: found {found}, need at least {required}")]
    InsufficientSamples { found: usize, required: usize },

    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Result type for evaluation operations.
pub type Result<T> = std::result::Result<T, EvaluationError>;

/// Which of the two paired streams a metric refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Raw,
    Filtered,
}

impl Stream {
    pub const ALL: [Stream; 2] = [Stream::Raw, Stream::Filtered];

    pub fn name(self) -> &'static str {
        match self {
            Stream::Raw => "raw",
            Stream::Filtered => "filtered",
        }
    }

    /// Selects this stream's position from a sample.
    #[inline]
    pub fn position(self, sample: &Sample) -> Coordinate {
        match self {
            Stream::Raw => sample.raw,
            Stream::Filtered => sample.filtered,
        }
    }
}

/// Mean and population standard deviation of one per-sample sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeanStd {
    pub mean: f64,
    pub std: f64,
}

impl MeanStd {
    /// Reduce a non-empty sequence.
    pub fn of(values: &[f64]) -> stats::Result<Self> {
        Ok(Self {
            mean: stats::mean(values)?,
            std: stats::standard_deviation(values)?,
        })
    }
}

/// A distance measure reduced in the horizontal plane and in 3D.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlanarSpatial<T> {
    pub planar: T,
    pub spatial: T,
}

/// A measure reduced independently on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerAxis<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> PerAxis<T> {
    pub fn get(&self, axis: Axis) -> &T {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

/// Evaluation of one stream of one file.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamResult {
    /// Mean coordinate of the stream's samples.
    pub centroid: Coordinate,
    /// Distance of each sample to the reference position.
    pub to_reference: PlanarSpatial<MeanStd>,
    /// Signed per-axis offset of each sample from the reference position.
    pub axis_to_reference: PerAxis<MeanStd>,
    /// Distance of each sample to the centroid.
    pub to_centroid: PlanarSpatial<MeanStd>,
    /// Signed per-axis offset of each sample from the centroid.
    pub axis_to_centroid: PerAxis<MeanStd>,
    /// Frame-to-frame jitter reduced to mean/std.
    pub jitter: PlanarSpatial<MeanStd>,
    /// Raw jitter sequences, `n - 1` values each.
    pub jitter_series: PlanarSpatial<Vec<f64>>,
    /// Distance from the centroid to the reference position.
    pub centroid_error: PlanarSpatial<f64>,
    /// Root mean square of the distance-to-reference sequence.
    pub rmse: PlanarSpatial<f64>,
}

/// Evaluation output for one measurement file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileResult {
    /// Source file, if the result came from disk.
    pub source_path: Option<PathBuf>,
    /// Session label taken from the file name.
    pub label: String,
    /// Ground truth position.
    pub reference: Coordinate,
    /// Number of samples evaluated.
    pub sample_count: usize,
    pub raw: StreamResult,
    pub filtered: StreamResult,
}

impl FileResult {
    /// Result for the requested stream.
    #[inline]
    pub fn stream(&self, stream: Stream) -> &StreamResult {
        match stream {
            Stream::Raw => &self.raw,
            Stream::Filtered => &self.filtered,
        }
    }

    /// Key used to group files measured at the same reference position.
    pub fn reference_key(&self) -> String {
        self.reference.key()
    }
}

fn per_axis_offsets(points: &[Coordinate], origin: &Coordinate) -> stats::Result<PerAxis<MeanStd>> {
    let offsets = |axis: Axis| -> Vec<f64> {
        points
            .iter()
            .map(|p| axis_distance(p.axis(axis), origin.axis(axis)))
            .collect()
    };

    Ok(PerAxis {
        x: MeanStd::of(&offsets(Axis::X))?,
        y: MeanStd::of(&offsets(Axis::Y))?,
        z: MeanStd::of(&offsets(Axis::Z))?,
    })
}

/// Evaluate one stream of positions against a reference.
///
/// # Errors
///
/// Returns `InsufficientSamples` for fewer than [`MIN_SAMPLES`] points.
pub fn evaluate_stream(reference: &Coordinate, points: &[Coordinate]) -> Result<StreamResult> {
    if points.len() < MIN_SAMPLES {
        return Err(EvaluationError::InsufficientSamples {
            found: points.len(),
            required: MIN_SAMPLES,
        });
    }

    // Accuracy
    let ref_2d: Vec<f64> = points.iter().map(|p| distance_2d(p, reference)).collect();
    let ref_3d: Vec<f64> = points.iter().map(|p| distance_3d(p, reference)).collect();

    // Precision
    let centroid = centroid(points).ok_or(StatsError::InvalidInput("centroid"))?;
    let centroid_2d: Vec<f64> = points.iter().map(|p| distance_2d(p, &centroid)).collect();
    let centroid_3d: Vec<f64> = points.iter().map(|p| distance_3d(p, &centroid)).collect();

    // Motion sickness
    let jitter_2d = abs_consecutive_deltas(&ref_2d);
    let jitter_3d = abs_consecutive_deltas(&ref_3d);

    Ok(StreamResult {
        centroid,
        to_reference: PlanarSpatial {
            planar: MeanStd::of(&ref_2d)?,
            spatial: MeanStd::of(&ref_3d)?,
        },
        axis_to_reference: per_axis_offsets(points, reference)?,
        to_centroid: PlanarSpatial {
            planar: MeanStd::of(&centroid_2d)?,
            spatial: MeanStd::of(&centroid_3d)?,
        },
        axis_to_centroid: per_axis_offsets(points, &centroid)?,
        jitter: PlanarSpatial {
            planar: MeanStd::of(&jitter_2d)?,
            spatial: MeanStd::of(&jitter_3d)?,
        },
        jitter_series: PlanarSpatial {
            planar: jitter_2d,
            spatial: jitter_3d,
        },
        centroid_error: PlanarSpatial {
            planar: distance_2d(&centroid, reference),
            spatial: distance_3d(&centroid, reference),
        },
        rmse: PlanarSpatial {
            planar: root_mean_square(&ref_2d)?,
            spatial: root_mean_square(&ref_3d)?,
        },
    })
}

/// Evaluate both streams of a sample sequence against a reference.
pub fn evaluate_samples(reference: Coordinate, samples: &[Sample]) -> Result<FileResult> {
    if samples.len() < MIN_SAMPLES {
        return Err(EvaluationError::InsufficientSamples {
            found: samples.len(),
            required: MIN_SAMPLES,
        });
    }

    let positions = |stream: Stream| -> Vec<Coordinate> {
        samples.iter().map(|s| stream.position(s)).collect()
    };

    Ok(FileResult {
        source_path: None,
        label: String::new(),
        reference,
        sample_count: samples.len(),
        raw: evaluate_stream(&reference, &positions(Stream::Raw))?,
        filtered: evaluate_stream(&reference, &positions(Stream::Filtered))?,
    })
}

/// Evaluate a parsed measurement log.
pub fn evaluate_log(log: &MeasurementLog) -> Result<FileResult> {
    let mut result = evaluate_samples(log.reference, &log.samples)?;
    result.source_path = Some(log.path.clone());
    result.label = log.label.clone();
    Ok(result)
}
