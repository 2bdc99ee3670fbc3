//! zoneplot - converts a timestamped /proc/zoneinfo log into per-metric CSV
//! time-series files.
//!
//! Usage:
//!   zoneplot capture.log                          # all zones, all metrics
//!   zoneplot capture.log -o csv/                  # custom output directory
//!   zoneplot capture.log -z "Node.0.zone.DMA"     # single zone
//!   zoneplot capture.log -s "pages.min nr_free_pages"
//!   zoneplot capture.log -b "2013-01-02 03:00:00" -e -1h

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use zoneplot::parser::{ParserOptions, RealFs, UNIT, ZoneinfoParser, describe};
use zoneplot::util::{TimeRange, parse_time};

/// Zoneinfo log to CSV converter.
#[derive(Parser)]
#[command(name = "zoneplot", about = "Convert /proc/zoneinfo logs to CSV time series", version)]
struct Args {
    /// Path to the timestamp-prefixed zoneinfo log.
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output directory for CSV files.
    #[arg(short, long, default_value = "./out")]
    output_dir: String,

    /// Filename prefix for CSV artifacts.
    #[arg(short, long, default_value = "zoneinfo")]
    label: String,

    /// Whitespace-delimited list of zones to accept,
    /// e.g. "Node.0.zone.DMA Node.0.zone.Normal". Default: all zones.
    #[arg(short, long, value_name = "LIST")]
    zones: Option<String>,

    /// Whitespace-delimited list of sub-metrics to accept,
    /// e.g. "pages.min nr_free_pages". Default: all sub-metrics.
    #[arg(short, long, value_name = "LIST")]
    sub_metrics: Option<String>,

    /// Inclusive start of the timestamp window. Supported formats:
    /// log format (2013-01-02 03:55:22), ISO 8601, Unix timestamp,
    /// relative (-1h, -30m, -2d), time only (07:00).
    #[arg(short = 'b', long = "begin", value_name = "TIME")]
    begin: Option<String>,

    /// Inclusive end of the timestamp window. Same formats as --begin.
    #[arg(short = 'e', long = "end", value_name = "TIME")]
    end: Option<String>,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("zoneplot={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Parses an optional time bound, exiting with a usage error on bad input.
fn parse_bound(arg: Option<&str>, flag: &str) -> Option<chrono::NaiveDateTime> {
    let time_str = arg?;
    match parse_time(time_str) {
        Ok(ts) => Some(ts),
        Err(e) => {
            eprintln!("Error in {}: {}", flag, e);
            std::process::exit(1);
        }
    }
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let begin = parse_bound(args.begin.as_deref(), "--begin");
    let end = parse_bound(args.end.as_deref(), "--end");

    let mut options = ParserOptions::new().with_range(TimeRange::new(begin, end));
    if let Some(zones) = &args.zones {
        options = options.with_zones(zones.split_whitespace());
    }
    if let Some(subs) = &args.sub_metrics {
        options = options.with_sub_metrics(subs.split_whitespace());
    }

    info!("zoneplot {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: input={}, output={}, label={}, unit={}",
        args.input, args.output_dir, args.label, UNIT
    );

    let parser = ZoneinfoParser::new(RealFs::new(), options);
    match parser.run(
        std::path::Path::new(&args.input),
        std::path::Path::new(&args.output_dir),
        &args.label,
    ) {
        Ok(outcome) => {
            if outcome.csv_files.is_empty() {
                info!("no columns matched the configured filters");
            }
            for path in &outcome.csv_files {
                // last path segment before .csv is the sub-metric name
                let sub_metric = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(|s| s.rsplit('.').next())
                    .unwrap_or("");
                match describe(sub_metric) {
                    Some(desc) => info!("wrote {} ({})", path.display(), desc),
                    None => info!("wrote {}", path.display()),
                }
            }
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
