//! pktinfo CLI - extract structured TCP fields from capture info columns
//!
//! Reads a packet-capture CSV export, parses the designated info column,
//! and writes the table back out with the extracted fields appended.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use pktinfo::{parse_table, InfoExtractor, OutputFormat, Record};

#[derive(Parser)]
#[command(name = "pktinfo")]
#[command(version, about = "Extract structured TCP fields from packet-capture info columns", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a capture CSV and append the extracted field columns
    Parse {
        /// Input CSV file (one row per packet)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the widened table
        #[arg(short, long)]
        output: PathBuf,

        /// Header name of the info column to parse
        #[arg(short, long, default_value = "Info")]
        column: String,

        /// Output format (csv or ndjson)
        #[arg(short, long, default_value = "csv")]
        format: String,
    },

    /// Extract fields from a single info string and print them as JSON
    Inspect {
        /// The info string to parse
        info: String,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            input,
            output,
            column,
            format,
        } => run_parse(input, output, column, format),
        Commands::Inspect { info } => run_inspect(&info),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Run the column pipeline over a capture CSV
fn run_parse(
    input: PathBuf,
    output: PathBuf,
    column: String,
    format: String,
) -> Result<(), String> {
    let format: OutputFormat = format.parse()?;

    let report = parse_table(&input, &output, &column, format)
        .map_err(|e| format!("Failed to parse {}: {}", input.display(), e))?;

    println!(
        "✓ Saved to {} ({} rows, {} columns)",
        output.display(),
        report.rows,
        report.columns
    );

    Ok(())
}

/// Extract one info string and print the record as pretty JSON
fn run_inspect(info: &str) -> Result<(), String> {
    let fields = InfoExtractor::new().extract(info);

    let json = fields
        .to_json_pretty()
        .map_err(|e| format!("Failed to serialize record: {}", e))?;
    println!("{}", json);

    Ok(())
}
