use crate::dataset::IdKind;
use thiserror::Error;

/// Describes what is syntactically wrong with a single column, token or line.
///
/// Format errors carry no position; the parser wraps them in a [`ParseError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FormatError(pub String);

impl FormatError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline(always)]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Positional wrapper around a [`FormatError`], raised while turning a line
/// into a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{file}:{line_number}: error parsing GxF record: `{line}'")]
pub struct ParseError {
    /// Name of the annotation file.
    pub file: String,
    /// 1-based line number of the offending line.
    pub line_number: usize,
    /// Raw text of the offending line.
    pub line: String,
    /// What was wrong with the line.
    #[source]
    pub cause: FormatError,
}

impl ParseError {
    /// The format error this parse error was raised for.
    pub fn format_error(&self) -> &FormatError {
        &self.cause
    }
}

/// Misuse of the attribute model. Signals a programming defect, not bad input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttrError {
    /// Attribute names may not be empty.
    #[error("attribute name must not be empty")]
    EmptyName,
    /// An attribute needs at least one value.
    #[error("attribute `{0}' must have at least one value")]
    NoValues(String),
    /// Requested attribute is absent.
    #[error("attribute `{0}' not found")]
    NotFound(String),
    /// Requested a single value from a multi-valued attribute.
    #[error("requested single value attribute `{name}' has {count} values")]
    NotSingleValue { name: String, count: usize },
}

/// Error type for gxfgenie operations.
#[derive(Debug, Error)]
pub enum GxfGenieError {
    /// A line could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Attribute model misuse.
    #[error(transparent)]
    Attr(#[from] AttrError),
    /// Identifier is not present in a dataset.
    #[error("{kind} not found: `{id}'")]
    NotFound { kind: IdKind, id: String },
    /// Input extension is missing or not supported.
    #[error("unsupported file extension in: {0}. Expected .gtf or .gff3 (with optional compression extension)")]
    UnsupportedExtension(String),
    /// Compression format recognized but not handled.
    #[error("unsupported compression for: {0}")]
    UnsupportedCompression(String),
    /// Wraps standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for gxfgenie operations.
pub type Result<T> = std::result::Result<T, GxfGenieError>;
