use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Generate noised mock versions of aggregated count tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Aggregate a count table and write a noised mock version of it
    Mock(MockArgs),
    /// Show per-group count, mean and standard deviation
    Groups(GroupsArgs),
    /// Preview the first few rows of a delimited file in a formatted table
    Preview(PreviewArgs),
}

/// Column role overrides shared by the commands that aggregate.
///
/// Each role flag names a column, or `none` to mark the role absent.
#[derive(Debug, Clone, Default, Args)]
pub struct RoleArgs {
    /// JSON file mapping roles (date, hour, region1, region2, count) to columns
    #[arg(long = "roles")]
    pub roles: Option<PathBuf>,
    /// Column holding the date
    #[arg(long)]
    pub date: Option<String>,
    /// Column holding the hour
    #[arg(long)]
    pub hour: Option<String>,
    /// Column holding the primary region identifier
    #[arg(long)]
    pub region1: Option<String>,
    /// Column holding the secondary region identifier
    #[arg(long)]
    pub region2: Option<String>,
    /// Column holding the count to perturb
    #[arg(long)]
    pub count: Option<String>,
}

#[derive(Debug, Args)]
pub struct MockArgs {
    /// Input CSV file with the real counts
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Directory for mock outputs, recorded with the dataset (defaults to <input>/out)
    #[arg(long = "outputs-path")]
    pub outputs_path: Option<PathBuf>,
    #[command(flatten)]
    pub roles: RoleArgs,
    /// Centre of the normal distribution the noise fraction is drawn from
    #[arg(long, allow_negative_numbers = true)]
    pub mu: f64,
    /// Spread of the normal distribution the noise fraction is drawn from
    #[arg(long, allow_negative_numbers = true)]
    pub sigma: f64,
    /// Seed for reproducible noise
    #[arg(long)]
    pub seed: Option<u64>,
    /// Emit every working column instead of the clean projection
    #[arg(long)]
    pub unclean: bool,
    /// CSV delimiter character for reading input
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Render output as an elastic table to stdout
    #[arg(long = "table")]
    pub table: bool,
}

#[derive(Debug, Args)]
pub struct GroupsArgs {
    /// Input CSV file to group
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    #[command(flatten)]
    pub roles: RoleArgs,
    /// CSV delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding for input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input CSV file to preview
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// CSV delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding for input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
