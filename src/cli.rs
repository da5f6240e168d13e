//! GTF/GFF3 parsing and indexing toolkit
//! Alejandro Gonzales-Irribarren, 2025

use crate::detect::detect_file_kind;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser, Debug)]
#[clap(
    name = "gxfgenie",
    version = env!("CARGO_PKG_VERSION"),
    author = "Alejandro Gonzales-Irribarren <alejandrxgzi@gmail.com>",
    about = "parse, validate and reformat GTF/GFF3 annotation files"
)]
pub struct Args {
    /// GTF or GFF3 annotation to read.
    ///
    /// The dialect comes from the suffix (.gtf, .gff3 or .gff), optionally
    /// followed by .gz or .bz2. Every line is validated; the first malformed
    /// line stops the run with its file name and line number.
    #[clap(
        short = 'i',
        long = "input",
        help = "Path to GTF/GFF3 file",
        value_name = "GXF",
        required = true
    )]
    pub input: PathBuf,

    /// Output filepath; non-required argument.
    ///
    /// Records and metadata are written back in the input dialect, normalized.
    /// Must carry the same dialect suffix as the input; .gz/.bz2 compress.
    #[clap(
        short = 'o',
        long = "output",
        help = "Path to reformatted output file",
        value_name = "OUT"
    )]
    pub output: Option<PathBuf>,

    /// Load every record into an in-memory dataset and report identifier counts.
    #[clap(short = 'd', long = "dataset", help = "Build identifier indices")]
    pub dataset: bool,

    #[clap(
        short = 'v',
        long = "verbose",
        help = "Log debug messages",
        conflicts_with = "quiet"
    )]
    pub verbose: bool,

    #[clap(short = 'q', long = "quiet", help = "Only log warnings and errors")]
    pub quiet: bool,
}

impl Args {
    /// Checks all the arguments for validity using validate_args()
    pub fn check(&self) -> Result<(), ArgError> {
        self.validate_args()
    }

    /// The input must exist, be non-empty and have a recognized suffix.
    fn check_input(&self) -> Result<(), ArgError> {
        let metadata = std::fs::metadata(&self.input).map_err(|_| {
            ArgError::InvalidInput(format!("file {:?} does not exist", self.input))
        })?;
        if metadata.len() == 0 {
            return Err(ArgError::InvalidInput(format!(
                "file {:?} is empty",
                self.input
            )));
        }

        detect_file_kind(&self.input).map_err(|e| ArgError::InvalidInput(e.to_string()))?;
        Ok(())
    }

    /// The output, when given, must use the input's dialect.
    fn check_output(&self) -> Result<(), ArgError> {
        let Some(output) = &self.output else {
            return Ok(());
        };

        let output_kind =
            detect_file_kind(output).map_err(|e| ArgError::InvalidOutput(e.to_string()))?;
        let input_kind =
            detect_file_kind(&self.input).map_err(|e| ArgError::InvalidInput(e.to_string()))?;

        if output_kind.format != input_kind.format {
            let err = format!(
                "file {:?} is {}, input is {}",
                output, output_kind.format, input_kind.format
            );
            return Err(ArgError::InvalidOutput(err));
        }
        Ok(())
    }

    /// Validates all the arguments
    fn validate_args(&self) -> Result<(), ArgError> {
        self.check_input()?;
        self.check_output()?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ArgError {
    /// The input file does not exist, is empty or has an unknown suffix.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The output suffix is unknown or names the other dialect.
    #[error("Invalid output: {0}")]
    InvalidOutput(String),
}
