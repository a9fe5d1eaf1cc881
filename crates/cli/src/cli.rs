//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use contracts::InterpolationMethod;

/// Attitude Syncer - interpolate platform attitude at frame timestamps
#[derive(Parser, Debug)]
#[command(
    name = "att-syncer",
    author,
    version,
    about = "Attitude/frame-time synchronizer",
    long_about = "Reads an attitude record (.att) and a frame-timing record (.time),\n\
                  interpolates roll, pitch and yaw at every frame timestamp inside the\n\
                  attitude time span, and writes the synchronized table."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "ATT_SYNCER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "ATT_SYNCER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synchronize attitude to frame times and write the table
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Inspect input files: sizes, time spans, sampling intervals, overlap
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); optional when inputs are given
    #[arg(short, long, env = "ATT_SYNCER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Attitude file (.att)
    #[arg(short, long, env = "ATT_SYNCER_ATTITUDE")]
    pub attitude: Option<PathBuf>,

    /// Frame-timing file (.time)
    #[arg(short = 't', long, env = "ATT_SYNCER_FRAME_TIMES")]
    pub frame_times: Option<PathBuf>,

    /// Output table path (defaults to att.txt)
    #[arg(short, long, env = "ATT_SYNCER_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Interpolation method
    #[arg(short, long, value_enum, env = "ATT_SYNCER_METHOD")]
    pub method: Option<MethodArg>,

    /// Unwrap ±180° jumps before fitting
    #[arg(long)]
    pub unwrap_angles: bool,

    /// Render raw vs. interpolated plots into this directory
    #[arg(long, value_name = "DIR", env = "ATT_SYNCER_PLOT_DIR")]
    pub plot: Option<PathBuf>,

    /// Also print every table row to stdout
    #[arg(long)]
    pub echo: bool,

    /// Resolve and validate configuration, then exit without reading inputs
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml", env = "ATT_SYNCER_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Attitude file (.att)
    #[arg(short, long, env = "ATT_SYNCER_ATTITUDE")]
    pub attitude: PathBuf,

    /// Frame-timing file (.time); enables the overlap report
    #[arg(short = 't', long, env = "ATT_SYNCER_FRAME_TIMES")]
    pub frame_times: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Interpolation method
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum MethodArg {
    /// Cubic spline (needs 4 samples)
    Cubic,
    /// Piecewise linear (needs 2 samples)
    Linear,
    /// Nearest sample (needs 1 sample)
    Nearest,
}

impl From<MethodArg> for InterpolationMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Cubic => Self::Cubic,
            MethodArg::Linear => Self::Linear,
            MethodArg::Nearest => Self::Nearest,
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_without_config() {
        let cli = Cli::try_parse_from([
            "att-syncer",
            "run",
            "-a",
            "pass.att",
            "-t",
            "pass.time",
            "-o",
            "out.txt",
            "--method",
            "linear",
            "--plot",
            "plots",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.config.is_none());
        assert_eq!(args.attitude, Some(PathBuf::from("pass.att")));
        assert_eq!(args.frame_times, Some(PathBuf::from("pass.time")));
        assert_eq!(args.output, Some(PathBuf::from("out.txt")));
        assert!(matches!(args.method, Some(MethodArg::Linear)));
        assert_eq!(args.plot, Some(PathBuf::from("plots")));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["att-syncer", "-q", "-v", "info", "-a", "x.att"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(
            InterpolationMethod::from(MethodArg::Nearest),
            InterpolationMethod::Nearest
        );
    }
}
