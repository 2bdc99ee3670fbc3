//! In-memory column buffers and CSV output.
//!
//! The parse loop appends rows here; nothing touches disk until
//! [`SeriesSet::write_csv`] runs after the whole input has been consumed.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// One output column: all accepted rows for a single `zone.sub_metric` key.
#[derive(Debug, Clone)]
pub struct Series {
    /// Column key, e.g. `Node.0.zone.DMA.pages.free`.
    pub key: String,
    /// `timestamp,value` rows in input order.
    pub rows: Vec<String>,
}

/// Arena of per-column buffers, keyed by column name.
///
/// A column key resolves to the same buffer for the lifetime of one parse
/// run; a buffer is allocated exactly once, on the key's first occurrence.
/// Iteration and flush follow first-allocation order so repeated runs over
/// the same input produce identical output.
#[derive(Debug, Clone, Default)]
pub struct SeriesSet {
    index: HashMap<String, usize>,
    series: Vec<Series>,
}

impl SeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a `timestamp,value` row to the column's buffer, allocating the
    /// buffer if this is the key's first occurrence.
    pub fn append(&mut self, key: &str, ts: &str, value: &str) {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                debug!("new column: {}", key);
                let slot = self.series.len();
                self.series.push(Series {
                    key: key.to_string(),
                    rows: Vec::new(),
                });
                self.index.insert(key.to_string(), slot);
                slot
            }
        };

        self.series[slot].rows.push(format!("{},{}", ts, value));
    }

    /// Returns the series for a column key, if one was allocated.
    pub fn get(&self, key: &str) -> Option<&Series> {
        self.index.get(key).map(|&slot| &self.series[slot])
    }

    /// Iterates series in first-allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Writes every series to `<out_dir>/<label>.<key>.csv`, one file per
    /// column, in first-allocation order. Contents are the rows joined by
    /// newline, with no header and no trailing newline.
    ///
    /// The output directory is created if missing. Any write failure aborts
    /// and propagates; a partial artifact set must not pass silently.
    pub fn write_csv(&self, out_dir: &Path, label: &str) -> io::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(out_dir)?;

        let mut written = Vec::with_capacity(self.series.len());
        for series in &self.series {
            let path = out_dir.join(format!("{}.{}.csv", label, series.key));
            std::fs::write(&path, series.rows.join("\n"))?;
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_allocates_once_per_key() {
        let mut set = SeriesSet::new();
        set.append("Node.0.zone.DMA.pages.free", "2013-01-02 03:55:22.13456", "3936");
        set.append("Node.0.zone.DMA.pages.free", "2013-01-02 03:55:32.13456", "3920");
        set.append("Node.0.zone.DMA.pages.min", "2013-01-02 03:55:22.13456", "25");

        assert_eq!(set.len(), 2);
        let free = set.get("Node.0.zone.DMA.pages.free").unwrap();
        assert_eq!(
            free.rows,
            vec![
                "2013-01-02 03:55:22.13456,3936",
                "2013-01-02 03:55:32.13456,3920"
            ]
        );
    }

    #[test]
    fn test_iteration_follows_first_allocation_order() {
        let mut set = SeriesSet::new();
        set.append("c", "t1", "1");
        set.append("a", "t1", "2");
        set.append("b", "t1", "3");
        set.append("a", "t2", "4");

        let keys: Vec<&str> = set.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_write_csv_contents() {
        let dir = tempfile::tempdir().unwrap();
        let mut set = SeriesSet::new();
        set.append("Node.0.zone.DMA.pages.free", "2013-01-02 03:55:22.13456", "3936");
        set.append("Node.0.zone.DMA.pages.free", "2013-01-02 03:55:32.13456", "3920");

        let written = set.write_csv(dir.path(), "zoneinfo").unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(
            written[0],
            dir.path().join("zoneinfo.Node.0.zone.DMA.pages.free.csv")
        );

        let content = std::fs::read_to_string(&written[0]).unwrap();
        // no header, no trailing newline
        assert_eq!(
            content,
            "2013-01-02 03:55:22.13456,3936\n2013-01-02 03:55:32.13456,3920"
        );
    }

    #[test]
    fn test_write_csv_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut set = SeriesSet::new();
        set.append("k1", "t1", "1");
        set.append("k2", "t1", "2");

        let first = set.write_csv(dir.path(), "zoneinfo").unwrap();
        let before: Vec<String> = first
            .iter()
            .map(|p| std::fs::read_to_string(p).unwrap())
            .collect();

        let second = set.write_csv(dir.path(), "zoneinfo").unwrap();
        assert_eq!(first, second);
        for (path, expected) in second.iter().zip(&before) {
            assert_eq!(&std::fs::read_to_string(path).unwrap(), expected);
        }
    }

    #[test]
    fn test_write_csv_empty_set_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let set = SeriesSet::new();
        let written = set.write_csv(dir.path(), "zoneinfo").unwrap();
        assert!(written.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
