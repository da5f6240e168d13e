//! # gxfgenie
//!
//! Strict parser and in-memory index for GTF and GFF3 gene annotations.
//!
//! Both dialects share one line engine, [`GxfParser`], which validates the
//! eight fixed columns and delegates column 9 to a [`Dialect`] ([`Gtf`] or
//! [`Gff3`]). Attributes are interned per parse, so the thousands of records
//! carrying `gene_type "protein_coding"` share one allocation. Parsed records
//! can be collected into a [`GxfDataSet`] and queried by identifier or by
//! overlapping range.
//!
//! ## Usage
//!
//! ```rust, ignore
//! use gxfgenie::{io::gxf_parser, Gtf, GxfDataSet, IdKind};
//! use std::path::Path;
//!
//! let mut dataset = GxfDataSet::new();
//! for item in gxf_parser(Path::new("gencode.v44.annotation.gtf.gz"), Gtf)? {
//!     if let Some(record) = item?.into_record() {
//!         dataset.add(record);
//!     }
//! }
//!
//! let transcripts = dataset.fetch_by_id(IdKind::Transcript, "ENST00000456328.2")?;
//! let hits = dataset.overlapping("chr1", 11869, 14409, None);
//! ```
//!
//! ## Command line
//!
//! ```bash
//! gxfgenie -i <INPUT> [OPTIONS]
//!
//!   -i, --input <GXF>    Path to GTF/GFF3 file (.gz/.bz2 accepted)
//!   -o, --output <OUT>   Write the normalized annotation here
//!   -d, --dataset        Build identifier indices and report counts
//!   -v, --verbose        Log debug messages
//!   -q, --quiet          Only log warnings and errors
//! ```

pub mod cli;
pub mod config;
pub mod convert;
pub mod dataset;
pub mod detect;
pub mod error;
pub mod gff3;
pub mod gtf;
pub mod gxf;
pub mod io;
pub mod memory;
pub mod parser;
pub mod range_index;

pub use cli::Args;
pub use config::Config;
pub use convert::{run, RunStats};
pub use dataset::{GxfDataSet, IdKind};
pub use error::{AttrError, FormatError, GxfGenieError, ParseError, Result};
pub use gff3::Gff3;
pub use gtf::Gtf;
pub use gxf::{
    AttrCache, AttrSet, AttrValue, Attribute, Columns, Dialect, Format, GxfItem, GxfMeta,
    GxfRecord, Phase, Score, Strand,
};
pub use memory::max_mem_usage_mb;
pub use parser::{BufLines, GxfParser, LineSource};
pub use range_index::RangeIndex;
