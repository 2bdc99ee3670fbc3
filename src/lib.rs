//! zoneplot - /proc/zoneinfo log to CSV time-series converter.
//!
//! Takes a timestamp-prefixed zoneinfo log (one metric-value pair per line,
//! grouped by NUMA node and zone) and fans it out into one CSV file per
//! `zone.sub_metric` column for downstream plotting.
//!
//! Log lines can be produced with:
//! `cat /proc/zoneinfo | sed "s/^/$(date +%Y-%m-%d\ %H:%M:%S.%05N)\t/"`

pub mod parser;
pub mod storage;
pub mod util;
