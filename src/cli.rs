// src/cli.rs

//! CLI argument parsing using `clap`.

use std::ffi::OsString;

use clap::{CommandFactory, Parser, ValueEnum};

/// Command-line arguments for `relaunch`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "relaunch",
    version,
    about = "Re-execute the running program in place whenever watched source files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory to watch.
    #[arg(short = 'd', long = "dir", value_name = "PATH")]
    pub dir: Option<String>,

    /// Interval in seconds to rescan the directory for new files.
    ///
    /// Default: 5 (or `interval_secs` from the config file).
    #[arg(short = 'i', long = "int", value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// File extension to watch, without the dot. May be repeated.
    ///
    /// Default: `rs`.
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Glob (relative to the watched directory) of files to ignore.
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Quiet period in milliseconds after the last change before restarting.
    #[arg(long, value_name = "MS")]
    pub settle_ms: Option<u64>,

    /// Unregister files that disappear between rescans.
    #[arg(long)]
    pub prune: bool,

    /// Optional TOML config file; flags take precedence over its values.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RELAUNCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Outcome of looking at the raw command line.
#[derive(Debug)]
pub enum Invocation {
    Run(CliArgs),
    /// No flags at all: the caller prints usage and exits non-zero.
    Usage,
}

/// Parse the process arguments.
pub fn parse() -> Invocation {
    parse_from(std::env::args_os())
}

/// Parse an explicit argument list (first element is the program name).
///
/// Malformed flags are reported by clap, which exits the process.
pub fn parse_from<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() <= 1 {
        return Invocation::Usage;
    }
    Invocation::Run(CliArgs::parse_from(args))
}

/// Print usage to stdout.
pub fn print_usage() {
    let mut cmd = CliArgs::command();
    // Failing to write help to stdout leaves nothing sensible to report.
    let _ = cmd.print_help();
    println!();
}
