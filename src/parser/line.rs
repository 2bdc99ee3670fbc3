//! Per-line tokenization and classification for zoneinfo logs.
//!
//! These are pure functions over `&str`, designed to be testable with string
//! inputs. Every line is classified from its third token alone; position in
//! the file never matters.

/// Sub-metric names that are reported bare but belong to the `pages` group.
/// `min 3956` becomes sub-metric `pages.min`.
pub const PROCESSED_SUB_METRICS: &[&str] = &["min", "high", "scanned", "spanned", "present"];

/// Zoneinfo fields that carry no plottable per-zone value (per-cpu pageset
/// details, protection arrays, and similar). Lines starting with these are
/// dropped without touching parse state.
pub const SKIPPED_SUB_METRICS: &[&str] = &[
    "protection",
    "pagesets",
    "cpu:",
    "count:",
    "high:",
    "batch:",
    "vm",
    "all_unreclaimable:",
    "prev_priority:",
    "start_pfn:",
    "inactive_ratio:",
];

/// Classification of a single log line.
///
/// Only `Data` lines emit a record; `ZoneHeading` updates the carried zone
/// context and `Skip` leaves it untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// `Node <n> zone <Name>` heading; payload is the dot-joined zone name,
    /// e.g. `Node.0.zone.DMA`.
    ZoneHeading(String),
    /// A metric line: derived sub-metric name plus its raw value token.
    Data { sub_metric: String, value: &'a str },
    /// Not a data line: too short, malformed, or in the skip set.
    Skip,
}

/// Splits a line into tokens, treating commas as whitespace.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect()
}

/// Classifies a tokenized line. `tokens[0]` and `tokens[1]` are the
/// timestamp; `tokens[2]` selects the branch.
pub fn classify<'a>(tokens: &[&'a str]) -> LineClass<'a> {
    if tokens.len() < 3 {
        return LineClass::Skip;
    }

    let field = tokens[2];

    if field == "Node" {
        // Node 0 zone      DMA
        return LineClass::ZoneHeading(tokens[2..].join("."));
    }

    if field == "pages" {
        // pages free     3936
        let (Some(name), Some(value)) = (tokens.get(3), tokens.get(4)) else {
            return LineClass::Skip;
        };
        return LineClass::Data {
            sub_metric: format!("pages.{}", name),
            value,
        };
    }

    if PROCESSED_SUB_METRICS.contains(&field) {
        // min      3956
        let Some(value) = tokens.get(3) else {
            return LineClass::Skip;
        };
        return LineClass::Data {
            sub_metric: format!("pages.{}", field),
            value,
        };
    }

    if SKIPPED_SUB_METRICS.contains(&field) {
        return LineClass::Skip;
    }

    // Any other field is a generic sub-metric: nr_free_pages 3936
    let Some(value) = tokens.get(3) else {
        return LineClass::Skip;
    };
    LineClass::Data {
        sub_metric: field.to_string(),
        value,
    }
}
