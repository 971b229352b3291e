//! sectconf CLI
//!
//! Usage:
//!   sectconf                        Parse ./test.toml and print the result
//!   sectconf <FILE>                 Parse FILE
//!   sectconf -f json <FILE>         Print the result as JSON
//!   sectconf -vv <FILE>             Log sections and tokens to stderr

use clap::{Parser, ValueEnum};
use log::{LevelFilter, debug};
use sectconf::{ConfError, Document, ParserConfig, parse_file};
use simplelog::WriteLogger;
use std::path::PathBuf;
use std::process::ExitCode;

/// Parse a sectioned configuration file and print the result
#[derive(Parser, Debug)]
#[command(name = "sectconf")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file to read
    #[arg(default_value = "test.toml")]
    file: PathBuf,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Accept strings missing their closing quote
    #[arg(long = "lenient-strings")]
    lenient_strings: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `{"section": {"key": value}}` on one line
    Text,
    /// Pretty-printed JSON
    Json,
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn render(document: &Document, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(document.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(document),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let _ = WriteLogger::init(
        log_level(args.verbose),
        simplelog::Config::default(),
        std::io::stderr(),
    );

    debug!("reading {:?}", args.file);

    let config = ParserConfig::new().with_lenient_strings(args.lenient_strings);
    let document = match parse_file(&args.file, config) {
        Ok(document) => document,
        Err(ConfError::Parse(e)) => {
            eprintln!("ERROR: {e}");
            return ExitCode::from(1);
        }
        Err(e) => {
            eprintln!("ERROR: {}: {e}", args.file.display());
            return ExitCode::from(2);
        }
    };

    match render(&document, args.format) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: failed to render output: {e}");
            ExitCode::from(2)
        }
    }
}
