//! Core data types, geometry, statistics and log loading.

pub mod geometry;
pub mod loaders;
pub mod stats;

pub use geometry::{axis_distance, centroid, distance_2d, distance_3d, Axis, Coordinate};
pub use loaders::{load_measurement_log, LoaderError, MeasurementLog, Sample};
pub use stats::{mean, median, standard_deviation, StatsError};
