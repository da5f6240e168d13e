//! Line-by-line engine shared by the GTF and GFF3 dialects.
//!
//! The parser pulls one line at a time from a [`LineSource`], classifies it
//! (blank/comment, `##` metadata, or data), validates the nine columns in a
//! fixed order and hands column 9 to the injected [`Dialect`]. Any failure is
//! reported as a [`ParseError`] naming the file and line, with the underlying
//! [`FormatError`] as its source, and ends the sequence.

use crate::error::{FormatError, ParseError, Result};
use crate::gxf::{
    check_position, check_range, check_seqname, AttrCache, Columns, Dialect, GxfItem, GxfMeta,
    GxfRecord, Phase, Score, Strand,
};
use std::io::{self, BufRead};
use std::iter::FusedIterator;

const GXF_NUM_COLS: usize = 9;

/// Sequential supplier of text lines, without line terminators.
pub trait LineSource {
    /// Next line, or `None` once the source is exhausted or closed.
    fn next_line(&mut self) -> io::Result<Option<String>>;

    /// Releases the underlying resource. Calling it again is a no-op.
    fn close(&mut self);
}

/// [`LineSource`] over any buffered reader, including decompressing ones.
#[derive(Debug)]
pub struct BufLines<R> {
    reader: Option<R>,
}

impl<R: BufRead> BufLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

impl<R: BufRead> LineSource for BufLines<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn close(&mut self) {
        self.reader = None;
    }
}

/// Forward-only reader of [`GxfItem`]s.
///
/// The parser owns its line source and its attribute interning cache. Both
/// are released when the input is exhausted, when the first error is
/// returned, on [`GxfParser::close`], or on drop, whichever comes first.
///
/// # Example
///
/// ```rust
/// use gxfgenie::{BufLines, GxfParser, Gtf};
///
/// let text = "chr1\tHAVANA\tgene\t11869\t14409\t.\t+\t.\tgene_id \"g1\"; level 2;\n";
/// let mut parser = GxfParser::new("inline.gtf", BufLines::new(text.as_bytes()), Gtf);
///
/// let record = parser.next().unwrap().unwrap().into_record().unwrap();
/// assert_eq!(record.attrs().get_value1("level").unwrap(), "2");
/// assert!(parser.next().is_none());
/// ```
pub struct GxfParser<L: LineSource, D: Dialect> {
    file: String,
    source: L,
    dialect: D,
    line_number: usize,
    attr_cache: AttrCache,
    closed: bool,
}

impl<L: LineSource, D: Dialect> GxfParser<L, D> {
    /// Creates a parser over `source`; `file` only names the input in errors.
    pub fn new(file: impl Into<String>, source: L, dialect: D) -> Self {
        let file = file.into();
        log::debug!("parsing {} as {}", file, dialect.format());
        Self {
            file,
            source,
            dialect,
            line_number: 0,
            attr_cache: AttrCache::new(),
            closed: false,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Number of the last line read, 0 before the first.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Distinct attributes interned so far in this session.
    pub fn interned(&self) -> usize {
        self.attr_cache.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Closes the line source and drops the interning cache.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.source.close();
        log::debug!(
            "closed {} after {} lines, {} distinct attributes",
            self.file,
            self.line_number,
            self.attr_cache.len()
        );
        self.attr_cache = AttrCache::new();
    }

    fn advance_line(&mut self) -> io::Result<Option<String>> {
        let line = self.source.next_line()?;
        if line.is_some() {
            self.line_number += 1;
        }
        Ok(line)
    }

    fn process_line(&mut self, line: &str) -> std::result::Result<Option<GxfItem>, ParseError> {
        if let Some(meta) = line.strip_prefix("##") {
            return Ok(self.parse_meta(meta));
        }
        if is_ignored(line) {
            return Ok(None);
        }

        self.parse_record(line)
            .map(|record| Some(GxfItem::Record(record)))
            .map_err(|cause| ParseError {
                file: self.file.clone(),
                line_number: self.line_number,
                line: line.to_string(),
                cause,
            })
    }

    fn parse_meta(&self, meta: &str) -> Option<GxfItem> {
        let value = meta.trim();
        if value.is_empty() {
            None
        } else {
            Some(GxfItem::Meta(
                GxfMeta::new(value).with_line_number(self.line_number),
            ))
        }
    }

    fn parse_record(&mut self, line: &str) -> std::result::Result<GxfRecord, FormatError> {
        let row = line.split('\t').collect::<Vec<_>>();
        if row.len() != GXF_NUM_COLS {
            return Err(FormatError::new(format!(
                "Wrong number of columns, expected {}, got {}: `{}'",
                GXF_NUM_COLS,
                row.len(),
                line
            )));
        }

        let blank_ok = self.dialect.allows_blank_columns();
        let seqname = parse_no_space_column(row[0])?;
        let source = parse_no_empty_column("source", row[1], blank_ok)?;
        let feature = parse_no_empty_column("feature", row[2], blank_ok)?;
        let start = parse_pos_column("start", row[3])?;
        let end = parse_pos_column("end", row[4])?;
        check_range(start, end)?;

        let columns = Columns {
            seqname: self.dialect.decode_column(seqname).into_owned(),
            source: self.dialect.decode_column(source).into_owned(),
            feature: self.dialect.decode_column(feature).into_owned(),
            start,
            end,
            score: parse_score(row[5])?,
            strand: parse_strand(row[6])?,
            phase: parse_phase(row[7])?,
        };
        let attrs = self.dialect.parse_attrs(row[8], &mut self.attr_cache)?;

        self.dialect
            .create_record(columns, attrs, self.line_number)
    }
}

impl<L: LineSource, D: Dialect> Iterator for GxfParser<L, D> {
    type Item = Result<GxfItem>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }

        loop {
            let line = match self.advance_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.close();
                    return None;
                }
                Err(e) => {
                    self.close();
                    return Some(Err(e.into()));
                }
            };

            match self.process_line(&line) {
                Ok(Some(item)) => return Some(Ok(item)),
                Ok(None) => continue,
                Err(e) => {
                    self.close();
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

impl<L: LineSource, D: Dialect> FusedIterator for GxfParser<L, D> {}

impl<L: LineSource, D: Dialect> Drop for GxfParser<L, D> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Blank lines and `#` comments.
#[inline(always)]
fn is_ignored(line: &str) -> bool {
    let line = line.trim_start();
    line.is_empty() || line.starts_with('#')
}

fn parse_no_space_column(value: &str) -> std::result::Result<&str, FormatError> {
    check_seqname(value)?;
    Ok(value)
}

fn parse_no_empty_column<'a>(
    name: &str,
    value: &'a str,
    blank_ok: bool,
) -> std::result::Result<&'a str, FormatError> {
    let empty = if blank_ok {
        value.is_empty()
    } else {
        value.trim().is_empty()
    };
    if empty {
        return Err(FormatError::new(format!(
            "Invalid `{name}', value may not be empty, got `{value}'"
        )));
    }
    Ok(value)
}

fn parse_pos_column(name: &str, value: &str) -> std::result::Result<u64, FormatError> {
    let pos = value.parse::<u64>().map_err(|_| {
        FormatError::new(format!(
            "Invalid `{name}', expected a positive integer, got `{value}'"
        ))
    })?;
    check_position(name, pos)?;
    Ok(pos)
}

fn parse_score(value: &str) -> std::result::Result<Option<Score>, FormatError> {
    if value == "." {
        return Ok(None);
    }

    let score = if value.contains('.') {
        value.parse::<f64>().ok().map(Score::Float)
    } else {
        value.parse::<i64>().ok().map(Score::Int)
    };

    score.map(Some).ok_or_else(|| {
        FormatError::new(format!(
            "Invalid `score', expected a floating point or integer number, or `.', got `{value}'"
        ))
    })
}

fn parse_strand(value: &str) -> std::result::Result<Option<Strand>, FormatError> {
    match value {
        "." => Ok(None),
        "+" => Ok(Some(Strand::Forward)),
        "-" => Ok(Some(Strand::Reverse)),
        _ => Err(FormatError::new(format!(
            "Invalid `strand', expected `+', `-', or `.', got `{value}'"
        ))),
    }
}

fn parse_phase(value: &str) -> std::result::Result<Option<Phase>, FormatError> {
    if value == "." {
        return Ok(None);
    }

    value
        .parse::<u8>()
        .ok()
        .and_then(|phase| Phase::try_from(phase).ok())
        .map(Some)
        .ok_or_else(|| {
            FormatError::new(format!(
                "Invalid `phase', expected `0', `1', `2', or `.', got `{value}'"
            ))
        })
}
