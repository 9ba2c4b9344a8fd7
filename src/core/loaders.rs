//! Loaders for reference-point measurement logs.
//!
//! Each log covers one measurement session at a known reference position:
//! - The reference position is encoded in the file name, e.g.
//!   `approach(1.0_2,5_0.0).txt`. Comma decimal separators are accepted.
//! - Every line holds one sample: `rawX,rawY,rawZ|filteredX,filteredY,filteredZ`.
//!
//! Parsing is strict. A bad file name or a single bad line fails the whole
//! file rather than being skipped.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::geometry::Coordinate;

/// `<label>(<x>_<y>_<z>)`, anchored at the start of the file name.
static REFERENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<label>[^()]*)\((?P<coords>[^()]*)\)").unwrap());

/// Errors that can occur while loading a measurement log.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed file name '{file}': {reason}")]
    MalformedFilename { file: String, reason: String },

    #[error("malformed line {line_number} in '{file}': {reason} (line: {line:?})")]
    MalformedLine {
        file: String,
        line_number: usize,
        line: String,
        reason: String,
    },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// One logical timestep: the raw estimate and its filtered counterpart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub raw: Coordinate,
    pub filtered: Coordinate,
}

impl Sample {
    #[inline]
    pub fn new(raw: Coordinate, filtered: Coordinate) -> Self {
        Self { raw, filtered }
    }
}

/// A fully parsed measurement log.
#[derive(Debug, Clone)]
pub struct MeasurementLog {
    /// Source file path.
    pub path: PathBuf,
    /// File name prefix before the parenthesis (usually the approach direction).
    pub label: String,
    /// Ground truth position parsed from the file name.
    pub reference: Coordinate,
    /// Samples in file order.
    pub samples: Vec<Sample>,
}

impl MeasurementLog {
    /// Number of samples in the log.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the log has no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// File name for diagnostics.
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse a real number, accepting `,` as the decimal separator.
fn parse_decimal(text: &str) -> Option<f64> {
    let normalized = text.trim().replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Extract the session label and reference position from a file name.
///
/// # Errors
///
/// Returns `MalformedFilename` if the parenthesized group is missing, does
/// not hold exactly three `_`-separated components, or a component is not a
/// real number.
pub fn parse_reference_position(file_name: &str) -> Result<(String, Coordinate)> {
    let malformed = |reason: String| LoaderError::MalformedFilename {
        file: file_name.to_string(),
        reason,
    };

    let captures = REFERENCE_PATTERN
        .captures(file_name)
        .ok_or_else(|| malformed("expected '<label>(<x>_<y>_<z>)'".to_string()))?;

    let label = captures["label"].to_string();
    let parts: Vec<&str> = captures["coords"].split('_').collect();

    if parts.len() != 3 {
        return Err(malformed(format!(
            "expected 3 reference components, found {}",
            parts.len()
        )));
    }

    let mut values = [0.0f64; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = parse_decimal(part)
            .ok_or_else(|| malformed(format!("invalid reference component {:?}", part)))?;
    }

    Ok((label, Coordinate::from(values)))
}

fn parse_triple(text: &str) -> std::result::Result<Coordinate, String> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 3 {
        return Err(format!(
            "expected 3 comma-separated values, found {}",
            parts.len()
        ));
    }

    let mut values = [0.0f64; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("invalid number {:?}", part.trim()))?;
    }

    Ok(Coordinate::from(values))
}

/// Parse one sample line. On failure the error string describes the reason.
pub fn parse_sample_line(line: &str) -> std::result::Result<Sample, String> {
    let (raw, filtered) = line
        .split_once('|')
        .ok_or_else(|| "missing '|' delimiter".to_string())?;

    if filtered.contains('|') {
        return Err("more than one '|' delimiter".to_string());
    }

    let raw = parse_triple(raw).map_err(|e| format!("raw position: {}", e))?;
    let filtered = parse_triple(filtered).map_err(|e| format!("filtered position: {}", e))?;

    Ok(Sample::new(raw, filtered))
}

/// Load a measurement log from disk.
///
/// The file handle is dropped before returning, on success and on error.
///
/// # Errors
///
/// Returns an error if the file cannot be read, its name does not encode a
/// reference position, or any line fails to parse.
pub fn load_measurement_log<P: AsRef<Path>>(path: P) -> Result<MeasurementLog> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| LoaderError::MalformedFilename {
            file: path.display().to_string(),
            reason: "file name is not valid UTF-8".to_string(),
        })?;

    let (label, reference) = parse_reference_position(file_name)?;

    let io_err = |source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let reader = BufReader::new(file);

    let mut samples = Vec::with_capacity(256);
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        let trimmed = line.trim_end_matches('\r');

        let sample = parse_sample_line(trimmed).map_err(|reason| LoaderError::MalformedLine {
            file: file_name.to_string(),
            line_number: idx + 1,
            line: trimmed.to_string(),
            reason,
        })?;
        samples.push(sample);
    }

    Ok(MeasurementLog {
        path: path.to_path_buf(),
        label,
        reference,
        samples,
    })
}

/// List the log files directly inside `directory` whose extension matches
/// `extension` (case-insensitive), sorted by path.
pub fn find_log_files(directory: &Path, extension: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case(extension))
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_parse_reference_position() {
        let (label, reference) = parse_reference_position("approach(1.0_2,5_0.0).txt").unwrap();
        assert_eq!(label, "approach");
        assert_eq!(reference, Coordinate::new(1.0, 2.5, 0.0));
    }

    #[test]
    fn test_parse_reference_position_negative_and_empty_label() {
        let (label, reference) = parse_reference_position("(-1,25_0_3.5).txt").unwrap();
        assert_eq!(label, "");
        assert_eq!(reference, Coordinate::new(-1.25, 0.0, 3.5));
    }

    #[test]
    fn test_parse_reference_position_two_components() {
        let err = parse_reference_position("test(1.0_2.0).txt").unwrap_err();
        assert!(matches!(err, LoaderError::MalformedFilename { .. }));
    }

    #[test]
    fn test_parse_reference_position_missing_parentheses() {
        for name in ["test.txt", "test(1.0_2.0_3.0.txt", "test1.0_2.0_3.0).txt"] {
            let err = parse_reference_position(name).unwrap_err();
            assert!(
                matches!(err, LoaderError::MalformedFilename { .. }),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_parse_reference_position_bad_number() {
        let err = parse_reference_position("test(1.0_abc_3.0).txt").unwrap_err();
        assert!(matches!(err, LoaderError::MalformedFilename { .. }));
    }

    #[test]
    fn test_parse_sample_line() {
        let sample = parse_sample_line("1.0,2.0,3.0|1.5, 2.5 ,3.5").unwrap();
        assert_eq!(sample.raw, Coordinate::new(1.0, 2.0, 3.0));
        assert_eq!(sample.filtered, Coordinate::new(1.5, 2.5, 3.5));
    }

    #[test]
    fn test_parse_sample_line_rejects_malformed() {
        assert!(parse_sample_line("1.0,2.0,3.0 1.0,2.0,3.0").is_err());
        assert!(parse_sample_line("1.0,2.0|1.0,2.0,3.0").is_err());
        assert!(parse_sample_line("1.0,2.0,3.0|1.0,2.0,x").is_err());
        assert!(parse_sample_line("1,2,3|4,5,6|7,8,9").is_err());
        assert!(parse_sample_line("").is_err());
    }

    #[test]
    fn test_load_measurement_log() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_log(
            temp_dir.path(),
            "north(1.0_1.0_1.0).txt",
            &["1.0,1.0,1.0|1.0,1.0,1.0", "1.0,1.0,2.0|1.0,1.0,1.5"],
        );

        let log = load_measurement_log(&path).unwrap();
        assert_eq!(log.label, "north");
        assert_eq!(log.reference, Coordinate::new(1.0, 1.0, 1.0));
        assert_eq!(log.len(), 2);
        assert_eq!(log.samples[1].raw, Coordinate::new(1.0, 1.0, 2.0));
        assert_eq!(log.samples[1].filtered, Coordinate::new(1.0, 1.0, 1.5));
    }

    #[test]
    fn test_load_measurement_log_crlf() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a(0_0_0).txt");
        fs::write(&path, "1,2,3|4,5,6\r\n7,8,9|1,2,3\r\n").unwrap();

        let log = load_measurement_log(&path).unwrap();
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_load_measurement_log_reports_bad_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_log(
            temp_dir.path(),
            "a(0_0_0).txt",
            &["1,2,3|4,5,6", "1,2,3;4,5,6", "1,2,3|4,5,6"],
        );

        match load_measurement_log(&path) {
            Err(LoaderError::MalformedLine {
                file,
                line_number,
                line,
                ..
            }) => {
                assert_eq!(file, "a(0_0_0).txt");
                assert_eq!(line_number, 2);
                assert_eq!(line, "1,2,3;4,5,6");
            }
            other => panic!("expected MalformedLine, got {:?}", other),
        }
    }

    #[test]
    fn test_load_measurement_log_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_measurement_log(temp_dir.path().join("a(0_0_0).txt")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn test_find_log_files() {
        let temp_dir = TempDir::new().unwrap();
        write_log(temp_dir.path(), "b(0_0_0).txt", &[]);
        write_log(temp_dir.path(), "a(0_0_0).TXT", &[]);
        write_log(temp_dir.path(), "notes.csv", &[]);
        fs::create_dir(temp_dir.path().join("nested.txt")).unwrap();

        let files = find_log_files(temp_dir.path(), "txt").unwrap();
        let names: Vec<String> = files.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["a(0_0_0).TXT", "b(0_0_0).txt"]);
    }
}
