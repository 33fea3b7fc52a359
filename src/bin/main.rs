//! Skyline Mesher CLI
//!
//! Generate a printable 3D skyline from a contributions JSON file.

use chrono::Datelike;
use clap::Parser;
use log::{Level, LevelFilter, Log, Metadata, Record};
use skyline_mesher::export::write_stl_ascii;
use skyline_mesher::{
    filter_by_month, load_contributions_json, ContributionGrid, FontSource, MesherConfig,
    ParseMode, SkylineMesher, SkylineRequest,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

/// First year contribution data can exist.
const FIRST_YEAR: i32 = 2008;

#[derive(Parser)]
#[command(name = "skyline-mesher")]
#[command(author, version, about = "Generate a 3D contribution skyline as STL", long_about = None)]
struct Cli {
    /// JSON file with one week-major grid of days per year, oldest first
    #[arg(short, long)]
    input: PathBuf,

    /// Username embossed on the front face
    #[arg(short, long)]
    user: String,

    /// Year or year range (e.g. "2023" or "2019-2023")
    #[arg(short, long, value_parser = parse_year_range)]
    year: (i32, i32),

    /// Output file path (defaults to <user>-<years>-github-skyline.stl)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Caption embossed on the top face
    #[arg(long)]
    text: Option<String>,

    /// Replaces the year caption on the front face
    #[arg(long)]
    right_text: Option<String>,

    /// First month (1-12) to include
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=12))]
    start_month: u32,

    /// Last month (1-12) to include
    #[arg(long, default_value = "12", value_parser = clap::value_parser!(u32).range(1..=12))]
    end_month: u32,

    /// Font for captions (defaults to the bundled DejaVu Sans)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Font used when the primary font cannot be loaded
    #[arg(long)]
    fallback_font: Option<PathBuf>,

    /// PNG logo for the front face
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Do not emboss a logo
    #[arg(long, conflicts_with = "logo")]
    no_logo: bool,

    /// STL model placed in the back-right corner
    #[arg(long)]
    character: Option<PathBuf>,

    /// Do not merge an auxiliary model
    #[arg(long, conflicts_with = "character")]
    no_character: bool,

    /// Raster samples across each face
    #[arg(long, default_value = "2000")]
    resolution: u32,

    /// Write ASCII STL instead of binary
    #[arg(long)]
    ascii: bool,

    /// Reject malformed ASCII STL input
    #[arg(long)]
    strict_stl: bool,

    /// Fail when the logo, captions or base cannot be generated
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn parse_year_range(s: &str) -> Result<(i32, i32), String> {
    let parse = |part: &str| {
        part.trim()
            .parse::<i32>()
            .map_err(|e| format!("invalid year '{}': {}", part, e))
    };

    let (start, end) = match s.split_once('-') {
        Some((start, end)) => (parse(start)?, parse(end)?),
        None => {
            let year = parse(s)?;
            (year, year)
        }
    };

    let current = chrono::Local::now().year();
    if start < FIRST_YEAR || end > current {
        return Err(format!("years must be between {} and {}", FIRST_YEAR, current));
    }
    if start > end {
        return Err("start year cannot be after end year".to_string());
    }
    Ok((start, end))
}

fn format_year_range(start: i32, end: i32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{:04}-{:02}", start, end.rem_euclid(100))
    }
}

/// Minimal stderr logger for the `log` facade.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let label = match record.level() {
            Level::Error => "error",
            Level::Warn => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        // Ignore write failures; logging must never stop generation.
        let _ = writeln!(std::io::stderr().lock(), "{}: {}", label, record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let (start_year, end_year) = cli.year;

    println!("Loading contributions from {:?}...", cli.input);
    let years = load_contributions_json(BufReader::new(File::open(&cli.input)?))?;
    let years = years
        .iter()
        .map(|grid| filter_by_month(grid, cli.start_month, cli.end_month))
        .collect::<Result<Vec<ContributionGrid>, _>>()?;
    println!("  Loaded {} year(s) of contributions", years.len());

    let mut config = MesherConfig::default()
        .with_raster_resolution(cli.resolution)
        .strict(cli.strict);
    if cli.strict_stl {
        config = config.with_parse_mode(ParseMode::Strict);
    }
    if let Some(font) = cli.font {
        config = config.with_font_file(font);
    }
    if let Some(fallback) = cli.fallback_font {
        config.fallback_font = Some(FontSource::File(fallback));
    }
    if cli.no_logo {
        config = config.without_logo();
    } else if let Some(logo) = cli.logo {
        config = config.with_logo(logo);
    }
    if cli.no_character {
        config = config.without_auxiliary_mesh();
    } else if let Some(character) = cli.character {
        config = config.with_auxiliary_mesh(character);
    }

    let mut request = SkylineRequest::new(years, cli.user.as_str(), start_year, end_year);
    request.top_text = cli.text;
    request.right_text = cli.right_text;

    let output_path = cli.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "{}-{}-github-skyline.stl",
            cli.user,
            format_year_range(start_year, end_year)
        ))
    });

    let mesher = SkylineMesher::with_config(config);
    let summary = if cli.ascii {
        let output = mesher.generate(&request)?;
        let writer = BufWriter::new(File::create(&output_path)?);
        write_stl_ascii(writer, &output.mesh, &cli.user)?;
        output.summary
    } else {
        mesher.write_stl(&request, &output_path)?
    };

    println!(
        "Exported STL ({} triangles) to {:?}",
        summary.total_triangles, output_path
    );
    println!(
        "  base {}, columns {}, text {}, logo {}, auxiliary {}",
        summary.base_triangles,
        summary.column_triangles,
        summary.text_triangles,
        summary.image_triangles,
        summary.auxiliary_triangles
    );

    Ok(())
}
