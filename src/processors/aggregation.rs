//! Directory-wide reduction of per-file results.
//!
//! Two-level reduction: each file contributes one mean and one standard
//! deviation per metric, computed from its own samples. Across files the
//! means are reduced to mean and median, and the per-file standard
//! deviations are averaged. Samples from different files are never pooled.

use std::collections::HashMap;

use thiserror::Error;

use super::evaluation::{FileResult, MeanStd, PerAxis, PlanarSpatial, Stream, StreamResult};
use crate::core::geometry::{centroid, Axis, Coordinate};
use crate::core::stats::{self, StatsError};

/// Errors that can occur during aggregation.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("no input files to aggregate")]
    NoInputFiles,

    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Result type for aggregation operations.
pub type Result<T> = std::result::Result<T, AggregationError>;

/// Directory-wide reduction of a per-file mean/std metric.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SummaryStats {
    /// Mean of the per-file means.
    pub mean: f64,
    /// Median of the per-file means.
    pub median: f64,
    /// Mean of the per-file standard deviations.
    pub mean_std: f64,
}

/// Directory-wide reduction of a metric with one value per file.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpreadStats {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation across files.
    pub std: f64,
}

impl SpreadStats {
    fn of(values: &[f64]) -> stats::Result<Self> {
        Ok(Self {
            mean: stats::mean(values)?,
            median: stats::median(values)?,
            std: stats::standard_deviation(values)?,
        })
    }
}

/// Summary of one stream across all files.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSummary {
    pub to_reference: PlanarSpatial<SummaryStats>,
    pub axis_to_reference: PerAxis<SummaryStats>,
    pub to_centroid: PlanarSpatial<SummaryStats>,
    pub axis_to_centroid: PerAxis<SummaryStats>,
    pub jitter: PlanarSpatial<SummaryStats>,
    pub centroid_error: PlanarSpatial<SpreadStats>,
    pub rmse: PlanarSpatial<SpreadStats>,
}

/// Centroids of every file measured at one reference position.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceGroup {
    /// Grouping key, see [`Coordinate::key`].
    pub key: String,
    pub reference: Coordinate,
    /// One raw centroid per file, in input order.
    pub raw_centroids: Vec<Coordinate>,
    /// One filtered centroid per file, in input order.
    pub filtered_centroids: Vec<Coordinate>,
}

impl ReferenceGroup {
    /// Number of files measured at this reference position.
    pub fn file_count(&self) -> usize {
        self.raw_centroids.len()
    }

    /// Per-file centroids of the requested stream.
    pub fn centroids(&self, stream: Stream) -> &[Coordinate] {
        match stream {
            Stream::Raw => &self.raw_centroids,
            Stream::Filtered => &self.filtered_centroids,
        }
    }

    /// Average of the per-file centroids of the requested stream.
    pub fn mean_centroid(&self, stream: Stream) -> Coordinate {
        centroid(self.centroids(stream)).unwrap_or(self.reference)
    }
}

/// Final reduction over a directory of measurement files.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySummary {
    pub file_count: usize,
    pub sample_count: usize,
    pub raw: StreamSummary,
    pub filtered: StreamSummary,
    /// Reference groups in first-seen order.
    pub groups: Vec<ReferenceGroup>,
}

impl DirectorySummary {
    /// Summary for the requested stream.
    #[inline]
    pub fn stream(&self, stream: Stream) -> &StreamSummary {
        match stream {
            Stream::Raw => &self.raw,
            Stream::Filtered => &self.filtered,
        }
    }

    /// Distinct reference positions, one per group.
    pub fn reference_positions(&self) -> Vec<Coordinate> {
        self.groups.iter().map(|g| g.reference).collect()
    }

    /// Aggregate centroid per reference position, aligned with
    /// [`reference_positions`](Self::reference_positions).
    pub fn per_reference_centroids(&self, stream: Stream) -> Vec<Coordinate> {
        self.groups.iter().map(|g| g.mean_centroid(stream)).collect()
    }
}

/// Group file centroids by reference key, preserving first-seen order.
pub fn group_by_reference(results: &[FileResult]) -> Vec<ReferenceGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<ReferenceGroup> = Vec::new();

    for result in results {
        let key = result.reference_key();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(ReferenceGroup {
                key,
                reference: result.reference,
                raw_centroids: Vec::new(),
                filtered_centroids: Vec::new(),
            });
            groups.len() - 1
        });

        groups[slot].raw_centroids.push(result.raw.centroid);
        groups[slot].filtered_centroids.push(result.filtered.centroid);
    }

    groups
}

fn reduce<F>(results: &[FileResult], stream: Stream, pick: F) -> stats::Result<SummaryStats>
where
    F: Fn(&StreamResult) -> MeanStd,
{
    let (means, stds): (Vec<f64>, Vec<f64>) = results
        .iter()
        .map(|r| {
            let m = pick(r.stream(stream));
            (m.mean, m.std)
        })
        .unzip();

    Ok(SummaryStats {
        mean: stats::mean(&means)?,
        median: stats::median(&means)?,
        mean_std: stats::mean(&stds)?,
    })
}

fn reduce_planar_spatial<F>(
    results: &[FileResult],
    stream: Stream,
    pick: F,
) -> stats::Result<PlanarSpatial<SummaryStats>>
where
    F: Fn(&StreamResult) -> &PlanarSpatial<MeanStd>,
{
    Ok(PlanarSpatial {
        planar: reduce(results, stream, |s| pick(s).planar)?,
        spatial: reduce(results, stream, |s| pick(s).spatial)?,
    })
}

fn reduce_per_axis<F>(
    results: &[FileResult],
    stream: Stream,
    pick: F,
) -> stats::Result<PerAxis<SummaryStats>>
where
    F: Fn(&StreamResult) -> &PerAxis<MeanStd>,
{
    Ok(PerAxis {
        x: reduce(results, stream, |s| *pick(s).get(Axis::X))?,
        y: reduce(results, stream, |s| *pick(s).get(Axis::Y))?,
        z: reduce(results, stream, |s| *pick(s).get(Axis::Z))?,
    })
}

fn spread<F>(results: &[FileResult], stream: Stream, pick: F) -> stats::Result<PlanarSpatial<SpreadStats>>
where
    F: Fn(&StreamResult) -> &PlanarSpatial<f64>,
{
    let planar: Vec<f64> = results.iter().map(|r| pick(r.stream(stream)).planar).collect();
    let spatial: Vec<f64> = results.iter().map(|r| pick(r.stream(stream)).spatial).collect();

    Ok(PlanarSpatial {
        planar: SpreadStats::of(&planar)?,
        spatial: SpreadStats::of(&spatial)?,
    })
}

/// Reduce one stream across all files.
pub fn summarize_stream(results: &[FileResult], stream: Stream) -> Result<StreamSummary> {
    if results.is_empty() {
        return Err(AggregationError::NoInputFiles);
    }

    Ok(StreamSummary {
        to_reference: reduce_planar_spatial(results, stream, |s| &s.to_reference)?,
        axis_to_reference: reduce_per_axis(results, stream, |s| &s.axis_to_reference)?,
        to_centroid: reduce_planar_spatial(results, stream, |s| &s.to_centroid)?,
        axis_to_centroid: reduce_per_axis(results, stream, |s| &s.axis_to_centroid)?,
        jitter: reduce_planar_spatial(results, stream, |s| &s.jitter)?,
        centroid_error: spread(results, stream, |s| &s.centroid_error)?,
        rmse: spread(results, stream, |s| &s.rmse)?,
    })
}

/// Reduce all file results into a directory summary.
///
/// # Errors
///
/// Returns `NoInputFiles` if `results` is empty.
pub fn summarize(results: &[FileResult]) -> Result<DirectorySummary> {
    if results.is_empty() {
        return Err(AggregationError::NoInputFiles);
    }

    Ok(DirectorySummary {
        file_count: results.len(),
        sample_count: results.iter().map(|r| r.sample_count).sum(),
        raw: summarize_stream(results, Stream::Raw)?,
        filtered: summarize_stream(results, Stream::Filtered)?,
        groups: group_by_reference(results),
    })
}
