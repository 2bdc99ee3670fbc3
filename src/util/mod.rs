//! Helper utilities.

mod time_parser;

pub use time_parser::{TimeParseError, TimeRange, parse_log_timestamp, parse_time};

use crate::parser::FileSystem;
use std::path::Path;

/// Returns `true` if `path` points at a readable, non-empty file.
///
/// Empty or missing inputs are rejected up front so the parser never produces
/// a partial artifact set from a bad capture.
pub fn is_valid_file<F: FileSystem>(fs: &F, path: &Path) -> bool {
    if !fs.exists(path) {
        return false;
    }
    match fs.file_size(path) {
        Ok(size) => size > 0,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::mock::MockFs;

    #[test]
    fn test_is_valid_file() {
        let mut fs = MockFs::new();
        fs.add_file("/logs/full.log", "2013-01-02 03:55:22 nr_free_pages 3936\n");
        fs.add_file("/logs/empty.log", "");

        assert!(is_valid_file(&fs, Path::new("/logs/full.log")));
        assert!(!is_valid_file(&fs, Path::new("/logs/empty.log")));
        assert!(!is_valid_file(&fs, Path::new("/logs/missing.log")));
    }
}
