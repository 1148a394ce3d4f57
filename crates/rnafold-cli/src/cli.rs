use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Reto Stamm",
    version,
    about = "cmdrnafold - Predict RNA secondary structures with the ViennaRNA RNAfold commandline tool.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict the minimum free energy structure of one or more sequences.
    Fold(FoldArgs),
    /// Locate the folding tool and report its version.
    Check(CheckArgs),
}

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// RNAfold-style text: sequence line followed by `structure (energy)`
    Text,
    /// A JSON array of records
    Json,
    /// One CSV row per sequence
    Csv,
}

/// Options that control how the folding tool is found and run.
#[derive(Args, Debug, Clone, Default)]
pub struct ToolArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Name of the folding executable to look up on PATH
    #[arg(long, value_name = "NAME")]
    pub tool: Option<String>,

    /// Use this executable instead of searching PATH
    #[arg(long, value_name = "PATH")]
    pub tool_path: Option<PathBuf>,

    /// Per-sequence timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Override a configuration value (e.g. --set tool.timeout-secs=30)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `fold` subcommand.
#[derive(Args, Debug)]
pub struct FoldArgs {
    /// Sequences to fold (A, U, G, C; case-insensitive)
    #[arg(value_name = "SEQUENCE")]
    pub sequences: Vec<String>,

    /// Read sequences from a FASTA file or a file with one sequence per line
    #[arg(short, long, value_name = "PATH", required_unless_present = "sequences")]
    pub input: Option<PathBuf>,

    /// Write results to a file instead of standard output
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Maximum number of RNAfold processes running at once.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub jobs: Option<usize>,

    #[command(flatten)]
    pub tool: ToolArgs,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub tool: ToolArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_fold_with_sequences_and_options() {
        let cli = Cli::try_parse_from([
            "cmdrnafold", "-vv", "fold", "AUGC", "GGGAAACCC", "--format", "json", "-j", "3",
            "--timeout", "2.5", "--tool-path", "/opt/RNAfold",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Fold(args) = cli.command else {
            panic!("expected fold command");
        };
        assert_eq!(args.sequences, vec!["AUGC", "GGGAAACCC"]);
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.jobs, Some(3));
        assert_eq!(args.tool.timeout, Some(2.5));
        assert_eq!(args.tool.tool_path, Some(PathBuf::from("/opt/RNAfold")));
    }

    #[test]
    fn fold_requires_sequences_or_input() {
        assert!(Cli::try_parse_from(["cmdrnafold", "fold"]).is_err());
        assert!(Cli::try_parse_from(["cmdrnafold", "fold", "-i", "seqs.fa"]).is_ok());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["cmdrnafold", "-q", "-v", "check"]).is_err());
    }
}
