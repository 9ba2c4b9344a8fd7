//! Plain-text console report of a directory summary.

use std::fmt::Write;

use crate::config::ReportConfig;
use crate::core::geometry::Axis;
use crate::processors::aggregation::{DirectorySummary, SpreadStats, StreamSummary, SummaryStats};
use crate::processors::evaluation::Stream;

pub const ACCURACY_HEADING: &str = "ACCURACY RESULTS";
pub const PRECISION_HEADING: &str = "PRECISION RESULTS";
pub const MOTION_SICKNESS_HEADING: &str = "MOTION SICKNESS RESULTS";

struct Formatter<'a> {
    config: &'a ReportConfig,
    out: String,
}

impl<'a> Formatter<'a> {
    fn new(config: &'a ReportConfig) -> Self {
        Self {
            config,
            out: String::with_capacity(4096),
        }
    }

    fn heading(&mut self, title: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        let _ = writeln!(self.out, "{}", title);
    }

    fn triple(&mut self, description: &str, values: [f64; 3]) {
        let p = self.config.precision;
        let _ = writeln!(
            self.out,
            "Mean | Median | Std {}: {:.*} | {:.*} | {:.*}{}",
            description, p, values[0], p, values[1], p, values[2], self.config.unit
        );
    }

    fn summary(&mut self, description: &str, stats: &SummaryStats) {
        self.triple(description, [stats.mean, stats.median, stats.mean_std]);
    }

    fn spread(&mut self, description: &str, stats: &SpreadStats) {
        self.triple(description, [stats.mean, stats.median, stats.std]);
    }
}

fn accuracy(f: &mut Formatter<'_>, name: &str, s: &StreamSummary) {
    f.summary(&format!("{} distances to reference position 2D", name), &s.to_reference.planar);
    f.summary(&format!("{} distances to reference position 3D", name), &s.to_reference.spatial);
    for axis in Axis::ALL {
        f.summary(
            &format!("{} distances on {} axis to reference {}", name, axis.name(), axis.name()),
            s.axis_to_reference.get(axis),
        );
    }
    f.spread(&format!("{} centroid distance to reference position 2D", name), &s.centroid_error.planar);
    f.spread(&format!("{} centroid distance to reference position 3D", name), &s.centroid_error.spatial);
    f.spread(&format!("{} RMSE to reference position 2D", name), &s.rmse.planar);
    f.spread(&format!("{} RMSE to reference position 3D", name), &s.rmse.spatial);
}

fn precision(f: &mut Formatter<'_>, name: &str, s: &StreamSummary) {
    f.summary(&format!("{} distances to measurement centroid 2D", name), &s.to_centroid.planar);
    f.summary(&format!("{} distances to measurement centroid 3D", name), &s.to_centroid.spatial);
    for axis in Axis::ALL {
        f.summary(
            &format!(
                "{} distances on {} axis to measurement centroid {}",
                name,
                axis.name(),
                axis.name()
            ),
            s.axis_to_centroid.get(axis),
        );
    }
}

fn motion_sickness(f: &mut Formatter<'_>, name: &str, s: &StreamSummary) {
    f.summary(&format!("{} delta distances 2D", name), &s.jitter.planar);
    f.summary(&format!("{} delta distances 3D", name), &s.jitter.spatial);
}

/// Render the summary as report text, one metric per line.
pub fn render_report(summary: &DirectorySummary, config: &ReportConfig) -> String {
    let mut f = Formatter::new(config);

    f.heading(ACCURACY_HEADING);
    for stream in Stream::ALL {
        accuracy(&mut f, stream.name(), summary.stream(stream));
    }

    f.heading(PRECISION_HEADING);
    for stream in Stream::ALL {
        precision(&mut f, stream.name(), summary.stream(stream));
    }

    f.heading(MOTION_SICKNESS_HEADING);
    for stream in Stream::ALL {
        motion_sickness(&mut f, stream.name(), summary.stream(stream));
    }

    let _ = write!(f.out, "\nAll values in {} units\n", unit_name(&config.unit));
    f.out
}

fn unit_name(unit: &str) -> &str {
    match unit {
        "m" => "meter",
        "cm" => "centimeter",
        "mm" => "millimeter",
        other => other,
    }
}
