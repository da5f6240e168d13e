use crate::config::Config;
use crate::dataset::{GxfDataSet, IdKind};
use crate::detect::{detect_file_kind, FileKind};
use crate::error::Result;
use crate::gff3::Gff3;
use crate::gtf::Gtf;
use crate::gxf::{Dialect, Format, GxfItem};
use crate::io::{gxf_parser, GxfWriter};
use crate::memory::max_mem_usage_mb;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

/// Summary statistics for a parse run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    /// Records parsed.
    pub records: usize,
    /// `##` metadata lines parsed.
    pub metadata: usize,
    /// Distinct attributes shared through interning.
    pub interned: usize,
    /// Wall clock time spent in the run.
    pub elapsed: Duration,
    /// Peak RSS of the process at the end of the run, in MB.
    pub max_rss_mb: f64,
}

/// Parses an annotation file with the provided configuration.
///
/// Detects the dialect from the input suffix, validates every line and,
/// depending on the config, writes the items back out normalized and/or
/// loads the records into a [`GxfDataSet`].
///
/// # Arguments
///
/// * `config` - Run configuration
///
/// # Returns
///
/// Returns RunStats with item counts, timing and memory usage.
///
/// # Errors
///
/// Returns the first parse error, or an I/O or detection error.
///
/// # Example
///
/// ```rust, ignore
/// use gxfgenie::{run, Config};
///
/// let stats = run(&Config::new("gencode.v44.annotation.gtf.gz"))?;
/// println!("{} records in {:?}", stats.records, stats.elapsed);
/// ```
pub fn run(config: &Config) -> Result<RunStats> {
    let start = Instant::now();
    let kind = detect_file_kind(&config.input)?;
    log::info!(
        "reading {} as {} ({:?} compression)",
        config.input.display(),
        kind.format,
        kind.compression
    );

    let mut stats = process_input(&config.input, &kind, config)?;

    stats.elapsed = start.elapsed();
    stats.max_rss_mb = max_mem_usage_mb();
    Ok(stats)
}

/// Dispatches to the dialect matching the detected format.
///
/// # Arguments
///
/// * `path` - Path to the input file
/// * `kind` - Detected format and compression
/// * `config` - Run configuration
///
/// # Returns
///
/// Returns counts for the processed file.
fn process_input(path: &Path, kind: &FileKind, config: &Config) -> Result<RunStats> {
    match kind.format {
        Format::Gtf => process_reader(path, Gtf, config),
        Format::Gff3 => process_reader(path, Gff3, config),
    }
}

/// Streams every item of `path` through the optional writer and dataset.
///
/// # Arguments
///
/// * `path` - Path to the input file
/// * `dialect` - Dialect to parse with
/// * `config` - Run configuration
///
/// # Returns
///
/// Returns counts for the processed file; timing is filled in by [`run`].
///
/// # Errors
///
/// Stops at the first error from the parser or the writer.
fn process_reader<D: Dialect>(path: &Path, dialect: D, config: &Config) -> Result<RunStats> {
    let mut parser = gxf_parser(path, dialect)?;
    let mut writer = config
        .output
        .as_deref()
        .map(GxfWriter::create)
        .transpose()?;
    let mut dataset = config.dataset.then(GxfDataSet::new);
    let mut stats = RunStats::default();

    while let Some(item) = parser.next() {
        let item = item?;
        if let Some(writer) = writer.as_mut() {
            writeln!(writer, "{item}")?;
        }

        match item {
            GxfItem::Meta(_) => stats.metadata += 1,
            GxfItem::Record(record) => {
                stats.records += 1;
                if let Some(dataset) = dataset.as_mut() {
                    dataset.add(record);
                }
            }
        }
        // the cache is dropped on close, count while it is alive
        stats.interned = parser.interned();
    }

    if let Some(writer) = writer {
        writer.finish()?;
        if let Some(output) = &config.output {
            log::info!("wrote {}", output.display());
        }
    }

    if let Some(dataset) = dataset {
        log_dataset(&dataset);
    }

    Ok(stats)
}

fn log_dataset(dataset: &GxfDataSet) {
    log::info!(
        "dataset: {} records, {} genes, {} transcripts, {} IDs",
        dataset.len(),
        dataset.id_count(IdKind::Gene),
        dataset.id_count(IdKind::Transcript),
        dataset.id_count(IdKind::Id)
    );

    let duplicated = dataset
        .by_id(IdKind::Gene)
        .filter(|(_, records)| {
            let first = records.first().map(|r| r.seqname());
            records.iter().any(|r| Some(r.seqname()) != first)
        })
        .count();
    if duplicated > 0 {
        log::debug!("{duplicated} genes annotated on more than one sequence");
    }
}
