//! # mdx CLI entry point
//!
//! Parses command-line arguments, initialises tracing, loads the optional
//! configuration file, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use mdx_cli::batch::{run_batch, BatchArgs};
use mdx_cli::check::{run_check, CheckArgs};
use mdx_cli::config::CliConfig;
use mdx_cli::{error_line, EXIT_ERROR};

/// Medical metadata extractor.
///
/// Checks data documents against schemas (required fields, declared types,
/// allowed values, patterns) and reports their embedded metadata and
/// completeness.
#[derive(Parser, Debug)]
#[command(name = "mdx", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log line format on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check one data document against one schema.
    Check(CheckArgs),

    /// Check every schema/example pair in two directories.
    Batch(BatchArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "mdx starting");

    let result = CliConfig::load_optional(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Check(args) => run_check(args, &config),
        Commands::Batch(args) => run_batch(args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("{}", error_line(&e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// `RUST_LOG` wins when set; otherwise verbosity picks the level.
fn init_tracing(verbose: u8, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdx_schema::OutputFormat;

    #[test]
    fn cli_parse_check() {
        let cli = Cli::try_parse_from(["mdx", "check", "schema.json", "data.json"]).unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.schema, PathBuf::from("schema.json"));
                assert_eq!(args.data, PathBuf::from("data.json"));
                assert!(args.format.is_none());
                assert!(!args.embed_base_metadata);
                assert!(args.recommend.is_empty());
                assert!(args.schema_type.is_none());
            }
            other => panic!("expected check, got {other:?}"),
        }
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn cli_parse_check_with_options() {
        let cli = Cli::try_parse_from([
            "mdx",
            "-vv",
            "--config",
            "mdx.yaml",
            "check",
            "s.yaml",
            "d.yaml",
            "--format",
            "text",
            "--embed-base-metadata",
            "--recommend",
            "bloodType",
            "--recommend",
            "contactInfo",
            "--schema-type",
            "patient",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("mdx.yaml")));
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.format, Some(OutputFormat::Text));
            assert!(args.embed_base_metadata);
            assert_eq!(args.recommend, vec!["bloodType", "contactInfo"]);
            assert_eq!(args.schema_type.as_deref(), Some("patient"));
        } else {
            panic!("expected check");
        }
    }

    #[test]
    fn cli_parse_batch() {
        let cli = Cli::try_parse_from(["mdx", "batch", "schemas", "samples", "--format", "yaml"]).unwrap();
        if let Commands::Batch(args) = cli.command {
            assert_eq!(args.schema_dir, PathBuf::from("schemas"));
            assert_eq!(args.data_dir, PathBuf::from("samples"));
            assert_eq!(args.format, Some(OutputFormat::Yaml));
        } else {
            panic!("expected batch");
        }
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["mdx", "check", "s.json", "d.json", "-v", "--log-format", "json"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["mdx", "check", "s.json", "d.json", "--format", "xml"]).is_err());
    }

    #[test]
    fn cli_requires_both_paths() {
        assert!(Cli::try_parse_from(["mdx", "check", "s.json"]).is_err());
    }
}
