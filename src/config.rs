use crate::cli::Args;
use std::path::PathBuf;

/// Normalized configuration for a parse run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Input GTF/GFF3 path.
    pub input: PathBuf,
    /// Where to write the reformatted annotation, if anywhere.
    pub output: Option<PathBuf>,
    /// Whether to load records into a dataset.
    pub dataset: bool,
    /// Log level for the binary.
    pub log_level: log::Level,
}

impl Config {
    /// Builds a run config from CLI arguments.
    ///
    /// # Arguments
    ///
    /// * `args` - Parsed command-line arguments
    ///
    /// # Returns
    ///
    /// Returns a Config with the verbosity flags folded into a log level.
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// use clap::Parser;
    /// use gxfgenie::{Args, Config};
    ///
    /// let args = Args::parse_from(["gxfgenie", "-i", "annot.gtf", "-q"]);
    /// let config = Config::from_args(&args);
    /// assert_eq!(config.log_level, log::Level::Warn);
    /// ```
    pub fn from_args(args: &Args) -> Self {
        let log_level = if args.verbose {
            log::Level::Debug
        } else if args.quiet {
            log::Level::Warn
        } else {
            log::Level::Info
        };

        Self {
            input: args.input.clone(),
            output: args.output.clone(),
            dataset: args.dataset,
            log_level,
        }
    }

    /// Config that only parses `input`, at the default log level.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            dataset: false,
            log_level: log::Level::Info,
        }
    }
}
