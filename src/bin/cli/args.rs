//! CLI Argument Structures
//!
//! This module contains all CLI argument definitions, command structures,
//! and value parsers used by the qiming binary.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use qiming_rs::core::calendar::Element;
use qiming_rs::{BirthInfo, Gender};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Chinese name recommendation from surname, gender and birth time
#[derive(Parser)]
#[command(name = "qiming")]
#[command(version = VERSION)]
#[command(about = "Qiming - layered Chinese name recommendation")]
#[command(long_about = "
Recommend Chinese given names using five-grid numerology, the five elements,
the four pillars of the birth moment and the birth-year zodiac.

Common Usage:

  # Exact birth moment
  qiming recommend 吴 male --birth 2025-10-31T10:00

  # Estimated due date (zodiac boundary analysis)
  qiming recommend 李 female --predue 2026-02 --weeks 2

  # Boundary analysis only
  qiming predue --year 2026 --month 2 --day 17

  # Inspect character data
  qiming resolve 嘉德文
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend names for a family name and gender
    Recommend(Box<RecommendArgs>),

    /// Analyze an estimated due date for zodiac-year boundary crossings
    Predue(PredueArgs),

    /// Show resolved character records
    Resolve(ResolveArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Validate a qiming configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

/// Configuration and data file locations shared by commands
#[derive(Args, Clone, Default)]
pub struct SourceArgs {
    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Character data file (JSON) replacing the built-in tables
    #[arg(long)]
    pub data: Option<PathBuf>,
}

#[derive(Args)]
pub struct RecommendArgs {
    /// Family name (one or two characters)
    #[arg(required_unless_present = "request")]
    pub surname: Option<String>,

    /// Gender: male|female (m, f, 男, 女 also accepted)
    #[arg(value_parser = parse_gender, required_unless_present = "request")]
    pub gender: Option<Gender>,

    /// Exact birth moment, China Standard Time: YYYY-MM-DD or YYYY-MM-DDTHH:MM
    #[arg(long, value_parser = parse_birth, conflicts_with = "predue")]
    pub birth: Option<BirthInfo>,

    /// Estimated due date: YYYY, YYYY-MM or YYYY-MM-DD
    #[arg(long)]
    pub predue: Option<String>,

    /// Uncertainty of the due date in weeks either side
    #[arg(long, requires = "predue")]
    pub weeks: Option<u32>,

    /// Preferred elements (wood, fire, earth, metal, water)
    #[arg(long, value_delimiter = ',')]
    pub prefer: Vec<Element>,

    /// Characters never to use
    #[arg(long)]
    pub exclude: Option<String>,

    /// Characters every name must contain
    #[arg(long)]
    pub require: Option<String>,

    /// Given-name length (1 or 2)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub length: Option<u8>,

    /// Poem or text to draw given-name characters from
    #[arg(long)]
    pub poetry: Option<String>,

    /// Title recorded for --poetry
    #[arg(long, requires = "poetry", default_value = "poetry")]
    pub poetry_title: String,

    /// Read the whole request from a JSON file
    #[arg(long, conflicts_with_all = ["surname", "birth", "predue"])]
    pub request: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Number of candidates to show
    #[arg(long)]
    pub top: Option<usize>,

    #[command(flatten)]
    pub sources: SourceArgs,
}

#[derive(Args)]
pub struct PredueArgs {
    /// Estimated year
    #[arg(long)]
    pub year: Option<i32>,

    /// Estimated month (1-12)
    #[arg(long)]
    pub month: Option<u32>,

    /// Estimated day
    #[arg(long)]
    pub day: Option<u32>,

    /// Uncertainty in weeks either side
    #[arg(long)]
    pub weeks: Option<u32>,

    /// Explicit range start (YYYY-MM-DD), used with --to instead of the estimate
    #[arg(long, value_parser = parse_date, requires = "to", conflicts_with_all = ["year", "month", "day", "weeks"])]
    pub from: Option<NaiveDate>,

    /// Explicit range end (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, requires = "from")]
    pub to: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Characters to resolve
    pub characters: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub sources: SourceArgs,
}

#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Configuration file to validate
    pub config: PathBuf,
}

pub fn parse_gender(value: &str) -> Result<Gender, String> {
    value.parse::<Gender>().map_err(|e| e.to_string())
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{value}': {e}"))
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM` and `YYYY-MM-DD HH:MM`.
pub fn parse_birth(value: &str) -> Result<BirthInfo, String> {
    let value = value.trim();
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(moment) = NaiveDateTime::parse_from_str(value, format) {
            let date = moment.date();
            return Ok(BirthInfo {
                year: date.year(),
                month: date.month(),
                day: date.day(),
                hour: Some(moment.hour()),
                minute: Some(moment.minute()),
            });
        }
    }
    let date = parse_date(value)?;
    Ok(BirthInfo {
        year: date.year(),
        month: date.month(),
        day: date.day(),
        hour: None,
        minute: None,
    })
}
