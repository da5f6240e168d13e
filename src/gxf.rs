mod attr;
pub use attr::*;

use crate::error::FormatError;
use crate::gff3::Gff3;
use crate::gtf::Gtf;
use std::borrow::Cow;
use std::fmt;

/// The two encodings of the nine-column annotation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Gtf,
    Gff3,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Format::Gtf => write!(f, "GTF"),
            Format::Gff3 => write!(f, "GFF3"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CDS phase; `.` in the file is `None` at the record level.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Phase {
    Zero,
    One,
    Two,
}

impl TryFrom<u8> for Phase {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Phase::Zero),
            1 => Ok(Phase::One),
            2 => Ok(Phase::Two),
            other => Err(other),
        }
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> u8 {
        match phase {
            Phase::Zero => 0,
            Phase::One => 1,
            Phase::Two => 2,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Score column. Integers and floats are kept apart so they format back the
/// way they were written.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Score {
    Int(i64),
    Float(f64),
}

impl Score {
    pub fn as_f64(&self) -> f64 {
        match self {
            Score::Int(v) => *v as f64,
            Score::Float(v) => *v,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Score::Int(v) => write!(f, "{v}"),
            // Debug keeps the decimal point on integral floats (`1.0`)
            Score::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// Columns 1-8 of a record, already converted to their typed form.
#[derive(Debug, Clone, PartialEq)]
pub struct Columns {
    pub seqname: String,
    pub source: String,
    pub feature: String,
    pub start: u64,
    pub end: u64,
    pub score: Option<Score>,
    pub strand: Option<Strand>,
    pub phase: Option<Phase>,
}

/// One annotation line of a GTF or GFF3 file.
///
/// Coordinates are 1-based and closed. A record can only be built through
/// [`GxfRecord::new`], which rejects a blank seqname, a zero start and a
/// start past the end.
#[derive(Debug, Clone, PartialEq)]
pub struct GxfRecord {
    format: Format,
    seqname: String,
    source: String,
    feature: String,
    start: u64,
    end: u64,
    score: Option<Score>,
    strand: Option<Strand>,
    phase: Option<Phase>,
    attrs: AttrSet,
    line_number: Option<usize>,
}

impl GxfRecord {
    pub fn new(format: Format, columns: Columns, attrs: AttrSet) -> Result<Self, FormatError> {
        check_seqname(&columns.seqname)?;
        check_position("start", columns.start)?;
        check_position("end", columns.end)?;
        check_range(columns.start, columns.end)?;

        Ok(Self {
            format,
            seqname: columns.seqname,
            source: columns.source,
            feature: columns.feature,
            start: columns.start,
            end: columns.end,
            score: columns.score,
            strand: columns.strand,
            phase: columns.phase,
            attrs,
            line_number: None,
        })
    }

    pub fn with_line_number(mut self, line_number: usize) -> Self {
        self.line_number = Some(line_number);
        self
    }

    #[inline(always)]
    pub fn format(&self) -> Format {
        self.format
    }

    #[inline(always)]
    pub fn seqname(&self) -> &str {
        &self.seqname
    }

    #[inline(always)]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline(always)]
    pub fn feature(&self) -> &str {
        &self.feature
    }

    #[inline(always)]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// 0-based start, for half-open `[start0, end)` arithmetic.
    #[inline(always)]
    pub fn start0(&self) -> u64 {
        self.start - 1
    }

    #[inline(always)]
    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn score(&self) -> Option<Score> {
        self.score
    }

    pub fn strand(&self) -> Option<Strand> {
        self.strand
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn attrs(&self) -> &AttrSet {
        &self.attrs
    }

    pub fn line_number(&self) -> Option<usize> {
        self.line_number
    }
}

impl fmt::Display for GxfRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.format {
            Format::Gtf => f.write_str(&Gtf.format_record(self)),
            Format::Gff3 => f.write_str(&Gff3.format_record(self)),
        }
    }
}

/// Content of a `##` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GxfMeta {
    value: String,
    line_number: Option<usize>,
}

impl GxfMeta {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            line_number: None,
        }
    }

    pub fn with_line_number(mut self, line_number: usize) -> Self {
        self.line_number = Some(line_number);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn line_number(&self) -> Option<usize> {
        self.line_number
    }
}

impl fmt::Display for GxfMeta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "##{}", self.value)
    }
}

/// What the parser yields, in file order.
#[derive(Debug, Clone, PartialEq)]
pub enum GxfItem {
    Record(GxfRecord),
    Meta(GxfMeta),
}

impl GxfItem {
    pub fn line_number(&self) -> Option<usize> {
        match self {
            GxfItem::Record(record) => record.line_number(),
            GxfItem::Meta(meta) => meta.line_number(),
        }
    }

    pub fn as_record(&self) -> Option<&GxfRecord> {
        match self {
            GxfItem::Record(record) => Some(record),
            GxfItem::Meta(_) => None,
        }
    }

    pub fn into_record(self) -> Option<GxfRecord> {
        match self {
            GxfItem::Record(record) => Some(record),
            GxfItem::Meta(_) => None,
        }
    }
}

impl fmt::Display for GxfItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GxfItem::Record(record) => record.fmt(f),
            GxfItem::Meta(meta) => meta.fmt(f),
        }
    }
}

/// Everything that differs between GTF and GFF3, injected into the shared
/// [`GxfParser`](crate::parser::GxfParser).
pub trait Dialect {
    fn format(&self) -> Format;

    /// Whether `source` and `feature` may consist of whitespace only.
    fn allows_blank_columns(&self) -> bool {
        false
    }

    /// Decodes a text column (seqname, source, feature) after validation.
    fn decode_column<'a>(&self, value: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(value)
    }

    /// Parses column 9, interning every attribute through `cache`.
    fn parse_attrs(&self, column: &str, cache: &mut AttrCache) -> Result<AttrSet, FormatError>;

    /// Formats an attribute set as column 9.
    fn format_attrs(&self, attrs: &AttrSet) -> String;

    /// Formats a whole record as one tab-separated line without terminator.
    fn format_record(&self, record: &GxfRecord) -> String;

    fn create_record(
        &self,
        columns: Columns,
        attrs: AttrSet,
        line_number: usize,
    ) -> Result<GxfRecord, FormatError> {
        Ok(GxfRecord::new(self.format(), columns, attrs)?.with_line_number(line_number))
    }
}

pub(crate) fn check_seqname(value: &str) -> Result<(), FormatError> {
    if value.is_empty() || value.contains(char::is_whitespace) {
        return Err(FormatError::new(format!(
            "Invalid `seqname', value may not be empty or contain whitespace, got `{value}'"
        )));
    }
    Ok(())
}

pub(crate) fn check_position(name: &str, value: u64) -> Result<(), FormatError> {
    if value == 0 {
        return Err(FormatError::new(format!(
            "Invalid `{name}', expected a positive integer, got `{value}'"
        )));
    }
    Ok(())
}

pub(crate) fn check_range(start: u64, end: u64) -> Result<(), FormatError> {
    if start > end {
        return Err(FormatError::new(format!(
            "'start' column must be less-than or equal to end, got `{start} > {end}'"
        )));
    }
    Ok(())
}

/// Splits column 9 on `;`, dropping the spaces after each separator and the
/// empty token left by a trailing separator.
#[inline(always)]
pub(crate) fn split_attr_column(column: &str) -> impl Iterator<Item = &str> {
    column
        .split(';')
        .map(|token| token.trim_start_matches(' '))
        .filter(|token| !token.is_empty())
}

/// `.` for an absent column value.
pub(crate) fn or_dot<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| ".".to_string(), |v| v.to_string())
}
