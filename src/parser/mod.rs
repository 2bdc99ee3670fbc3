//! Zoneinfo log parser.
//!
//! Reconstructs the `zone → sub-metric` hierarchy from a flat,
//! timestamp-prefixed log stream and routes accepted `(timestamp, value)`
//! pairs into per-column buffers. The zone context set by a `Node <n> zone
//! <Name>` heading persists across lines until the next heading; everything
//! else is decided per line.

pub mod line;
pub mod mock;
mod traits;

pub use traits::{FileSystem, RealFs};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::storage::SeriesSet;
use crate::util::{TimeRange, is_valid_file};
use line::{LineClass, classify, tokenize};

/// Unit shared by every zoneinfo metric.
pub const UNIT: &str = "pages";

/// Human-readable description for well-known sub-metrics, used when reporting
/// written artifacts.
pub fn describe(sub_metric: &str) -> Option<&'static str> {
    match sub_metric {
        "nr_free_pages" => Some("Number of free pages"),
        "nr_inactive_anon" => Some("Number of inactive anonymous pages"),
        "nr_active_anon" => Some("Number of active anonymous pages"),
        "nr_inactive_file" => Some("Number of inactive file cache pages"),
        "nr_active_file" => Some("Number of active file cache pages"),
        _ => None,
    }
}

/// Error types that can occur during a parse run.
#[derive(Debug, Clone)]
pub enum ParseError {
    /// Input file is missing, unreadable, or empty. No artifacts are produced.
    InvalidInput(String),
    /// I/O failure while reading the input or writing an artifact.
    Io(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidInput(path) => write!(f, "invalid input file: {}", path),
            ParseError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ParseError {}

/// Filtering options for one parse run.
///
/// All fields are optional; the defaults accept every zone, every sub-metric,
/// and every timestamp.
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Accepted zone names, e.g. `Node.0.zone.DMA`. `None` accepts all.
    pub zones: Option<HashSet<String>>,
    /// Accepted sub-metric names, e.g. `pages.min` or `nr_free_pages`.
    /// `None` accepts all.
    pub sub_metrics: Option<HashSet<String>>,
    /// Inclusive timestamp window.
    pub range: TimeRange,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the run to the given zone names.
    pub fn with_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zones = Some(zones.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts the run to the given sub-metric names.
    pub fn with_sub_metrics<I, S>(mut self, sub_metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sub_metrics = Some(sub_metrics.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts the run to the given timestamp window.
    pub fn with_range(mut self, range: TimeRange) -> Self {
        self.range = range;
        self
    }
}

/// Result summary of a completed run.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Paths of the written CSV artifacts, in first-allocation order.
    pub csv_files: Vec<PathBuf>,
    /// Total number of accepted rows across all columns.
    pub rows: usize,
}

/// Stateful zoneinfo log parser.
///
/// Owns a [`FileSystem`] handle and the run options; each `parse` call is
/// independent and shares no state with previous calls.
pub struct ZoneinfoParser<F: FileSystem> {
    fs: F,
    options: ParserOptions,
}

impl<F: FileSystem> ZoneinfoParser<F> {
    pub fn new(fs: F, options: ParserOptions) -> Self {
        Self { fs, options }
    }

    /// Parses the input log into in-memory column buffers.
    ///
    /// Per-line control flow, in strict order: token count, timestamp range,
    /// classification, zone/sub-metric filters, append. An out-of-range line
    /// is dropped before classification, so it never updates the carried
    /// zone. Zero accepted lines is success with an empty set; only a
    /// missing, unreadable, or empty input is an error.
    pub fn parse(&self, input: &Path) -> Result<SeriesSet, ParseError> {
        info!("processing {}", input.display());

        if !is_valid_file(&self.fs, input) {
            return Err(ParseError::InvalidInput(input.display().to_string()));
        }

        let content = self
            .fs
            .read_to_string(input)
            .map_err(|e| ParseError::Io(e.to_string()))?;

        let mut series = SeriesSet::new();
        let mut zone: Option<String> = None;

        for raw in content.lines() {
            let tokens = tokenize(raw);
            if tokens.len() < 3 {
                continue;
            }

            let ts = format!("{} {}", tokens[0], tokens[1]);
            if self.options.range.is_out_of_range(&ts) {
                continue;
            }

            match classify(&tokens) {
                LineClass::ZoneHeading(name) => {
                    zone = Some(name);
                }
                LineClass::Skip => {}
                LineClass::Data { sub_metric, value } => {
                    let Some(zone) = zone.as_deref() else {
                        // data before the first zone heading has no column
                        debug!("dropping {} before first zone heading", sub_metric);
                        continue;
                    };

                    if let Some(zones) = &self.options.zones
                        && !zones.contains(zone)
                    {
                        continue;
                    }
                    if let Some(subs) = &self.options.sub_metrics
                        && !subs.contains(&sub_metric)
                    {
                        continue;
                    }

                    let col = format!("{}.{}", zone, sub_metric);
                    series.append(&col, &ts, value);
                }
            }
        }

        Ok(series)
    }

    /// Parses the input and writes one CSV artifact per accepted column into
    /// `out_dir`, named `<label>.<column>.csv`.
    pub fn run(&self, input: &Path, out_dir: &Path, label: &str) -> Result<ParseOutcome, ParseError> {
        let series = self.parse(input)?;

        let rows = series.iter().map(|s| s.rows.len()).sum();
        let csv_files = series
            .write_csv(out_dir, label)
            .map_err(|e| ParseError::Io(e.to_string()))?;

        info!("{} columns, {} rows accepted", csv_files.len(), rows);
        Ok(ParseOutcome { csv_files, rows })
    }
}
