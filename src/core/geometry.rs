//! Coordinate type and distance primitives.

use std::fmt;

/// A position in the fixed measurement frame, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    /// Creates a coordinate from its three components.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component selected by `axis`.
    #[inline]
    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Grouping key built from the parsed components.
    ///
    /// Uses the shortest round-trip float formatting, so `1.0` and `1.00`
    /// in a file name produce the same key while `1.0` and `1.05` do not.
    pub fn key(&self) -> String {
        format!("{:?},{:?},{:?}", self.x, self.y, self.z)
    }
}

impl From<[f64; 3]> for Coordinate {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the three frame axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Upper-case axis name as printed in reports.
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Signed offset of a measured axis value from a reference value.
#[inline]
pub fn axis_distance(measurement: f64, reference: f64) -> f64 {
    measurement - reference
}

/// Euclidean distance in the horizontal (x, y) plane.
#[inline]
pub fn distance_2d(p: &Coordinate, q: &Coordinate) -> f64 {
    let dx = p.x - q.x;
    let dy = p.y - q.y;
    (dx * dx + dy * dy).sqrt()
}

/// Euclidean distance in 3D.
#[inline]
pub fn distance_3d(p: &Coordinate, q: &Coordinate) -> f64 {
    let dx = p.x - q.x;
    let dy = p.y - q.y;
    let dz = p.z - q.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Arithmetic mean of a set of coordinates, computed per axis.
///
/// Returns `None` for an empty slice.
pub fn centroid(points: &[Coordinate]) -> Option<Coordinate> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let (sx, sy, sz) = points
        .iter()
        .fold((0.0, 0.0, 0.0), |(sx, sy, sz), p| (sx + p.x, sy + p.y, sz + p.z));

    Some(Coordinate::new(sx / n, sy / n, sz / n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_distance_is_signed() {
        assert_eq!(axis_distance(1.5, 2.0), -0.5);
        assert_eq!(axis_distance(2.0, 1.5), 0.5);
    }

    #[test]
    fn test_distance_2d_ignores_z() {
        let p = Coordinate::new(0.0, 0.0, 0.0);
        let q = Coordinate::new(3.0, 4.0, 100.0);
        assert_relative_eq!(distance_2d(&p, &q), 5.0);
    }

    #[test]
    fn test_distance_3d() {
        let p = Coordinate::new(1.0, 2.0, 3.0);
        let q = Coordinate::new(3.0, 5.0, 9.0);
        assert_relative_eq!(distance_3d(&p, &q), 7.0);
    }

    #[test]
    fn test_distance_symmetry_and_identity() {
        let points = [
            Coordinate::new(0.0, 0.0, 0.0),
            Coordinate::new(-1.25, 3.5, 0.75),
            Coordinate::new(10.0, -7.0, 2.0),
            Coordinate::new(0.001, 0.002, -0.003),
        ];

        for p in &points {
            assert_eq!(distance_3d(p, p), 0.0);
            assert_eq!(distance_2d(p, p), 0.0);
            for q in &points {
                assert_eq!(distance_3d(p, q), distance_3d(q, p));
                assert_eq!(distance_2d(p, q), distance_2d(q, p));
            }
        }
    }

    #[test]
    fn test_centroid() {
        let points = [
            Coordinate::new(0.0, 0.0, 0.0),
            Coordinate::new(2.0, 4.0, 6.0),
        ];
        assert_eq!(centroid(&points), Some(Coordinate::new(1.0, 2.0, 3.0)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn test_key_uses_parsed_value() {
        let a = Coordinate::new("1.0".parse().unwrap(), 2.5, 0.0);
        let b = Coordinate::new("1.00".parse().unwrap(), 2.50, 0.0);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key(), "1.0,2.5,0.0");
        assert_ne!(a.key(), Coordinate::new(1.05, 2.5, 0.0).key());
    }
}
