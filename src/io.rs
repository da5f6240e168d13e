use crate::detect::{detect_compression, Compression};
use crate::error::Result;
use crate::gxf::Dialect;
use crate::parser::{BufLines, GxfParser};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Line source over a possibly compressed file.
pub type FileLines = BufLines<BufReader<Box<dyn Read>>>;

/// Parser reading straight from a file.
pub type FileParser<D> = GxfParser<FileLines, D>;

/// Opens `path` as a [`FileLines`], decompressing by suffix.
///
/// Multi-member gzip and bzip2 streams (as written by `bgzip` and `pbzip2`)
/// are read to the end.
///
/// # Errors
///
/// Fails when the file can't be opened or uses `.Z` compression.
pub fn open_lines(path: &Path) -> Result<FileLines> {
    let file = File::open(path)?;
    let reader: Box<dyn Read> = match detect_compression(path)? {
        Compression::Gzip => Box::new(flate2::read::MultiGzDecoder::new(file)),
        Compression::Bzip2 => Box::new(bzip2::read::MultiBzDecoder::new(file)),
        _ => Box::new(file),
    };
    Ok(BufLines::new(BufReader::new(reader)))
}

/// Opens `path` for parsing with `dialect`. The file name in error messages
/// is the path as given.
pub fn gxf_parser<D: Dialect>(path: &Path, dialect: D) -> Result<FileParser<D>> {
    let lines = open_lines(path)?;
    Ok(GxfParser::new(path.display().to_string(), lines, dialect))
}

/// Output file, compressed to match its suffix.
pub enum GxfWriter {
    Plain(BufWriter<File>),
    Gzip(flate2::write::GzEncoder<BufWriter<File>>),
    Bzip2(bzip2::write::BzEncoder<BufWriter<File>>),
}

impl GxfWriter {
    /// Creates (or truncates) `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let compression = detect_compression(path)?;
        let file = BufWriter::new(File::create(path)?);
        Ok(match compression {
            Compression::Gzip => GxfWriter::Gzip(flate2::write::GzEncoder::new(
                file,
                flate2::Compression::default(),
            )),
            Compression::Bzip2 => GxfWriter::Bzip2(bzip2::write::BzEncoder::new(
                file,
                bzip2::Compression::default(),
            )),
            _ => GxfWriter::Plain(file),
        })
    }

    /// Writes the compression trailer, if any, and flushes to disk.
    pub fn finish(self) -> Result<()> {
        let mut inner = match self {
            GxfWriter::Plain(w) => w,
            GxfWriter::Gzip(w) => w.finish()?,
            GxfWriter::Bzip2(w) => w.finish()?,
        };
        inner.flush()?;
        Ok(())
    }
}

impl Write for GxfWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            GxfWriter::Plain(w) => w.write(buf),
            GxfWriter::Gzip(w) => w.write(buf),
            GxfWriter::Bzip2(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            GxfWriter::Plain(w) => w.flush(),
            GxfWriter::Gzip(w) => w.flush(),
            GxfWriter::Bzip2(w) => w.flush(),
        }
    }
}
