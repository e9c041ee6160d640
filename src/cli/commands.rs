//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Batch cleaner for unified e-commerce drops
#[derive(Parser, Debug)]
#[command(name = "shopclean")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Job configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Result output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: MessageFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transform the newest raw drop into one clean artifact
    Transform {
        /// Run name, carried through logs and the result message
        #[arg(long)]
        job_name: String,
    },

    /// Generate a synthetic drop and upload it under the raw prefix
    Generate {
        /// Customer pool size
        #[arg(long, default_value = "200")]
        customers: usize,

        /// Number of orders (one payment each)
        #[arg(long, default_value = "1000")]
        orders: usize,

        /// Order dates fall within this many days before now
        #[arg(long, default_value = "30")]
        days: u32,

        /// RNG seed for a reproducible drop
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the effective configuration as YAML
    Config,
}

/// How result messages are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MessageFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_transform_requires_job_name() {
        assert!(Cli::try_parse_from(["shopclean", "transform"]).is_err());

        let cli = Cli::try_parse_from(["shopclean", "transform", "--job-name", "nightly"]).unwrap();
        match cli.command {
            Commands::Transform { job_name } => assert_eq!(job_name, "nightly"),
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.format, MessageFormat::Json);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["shopclean", "generate"]).unwrap();
        match cli.command {
            Commands::Generate {
                customers,
                orders,
                days,
                seed,
            } => {
                assert_eq!((customers, orders, days, seed), (200, 1000, 30, None));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "shopclean",
            "config",
            "-C",
            "job.yaml",
            "--verbose",
            "--format",
            "pretty",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("job.yaml")));
        assert!(cli.verbose);
        assert_eq!(cli.format, MessageFormat::Pretty);
        assert!(matches!(cli.command, Commands::Config));
    }
}
