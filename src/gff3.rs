use crate::error::FormatError;
use crate::gxf::{
    or_dot, split_attr_column, AttrCache, AttrSet, AttrValue, Dialect, Format, GxfRecord,
};
use std::borrow::Cow;

/// GFF3 dialect: `name=value1,value2` attributes with percent-escaping.
///
/// Three escaping policies are applied on output:
///
/// * seqname: left alone when it only uses `[A-Za-z0-9.:^*$@!+_?|-]`,
///   otherwise everything outside `[A-Za-z0-9_.~-]` is escaped.
/// * columns 2-8: control characters and `%`.
/// * column 9: as columns 2-8, plus the delimiters `;`, `=`, `&` and `,`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gff3;

impl Dialect for Gff3 {
    fn format(&self) -> Format {
        Format::Gff3
    }

    // refseq puts spaces in these
    fn allows_blank_columns(&self) -> bool {
        true
    }

    fn decode_column<'a>(&self, value: &'a str) -> Cow<'a, str> {
        unescape(value)
    }

    fn parse_attrs(&self, column: &str, cache: &mut AttrCache) -> Result<AttrSet, FormatError> {
        let mut attrs = AttrSet::new();
        for token in split_attr_column(column) {
            let (name, value) = token
                .split_once('=')
                .filter(|(name, value)| !name.is_empty() && !value.is_empty())
                .ok_or_else(|| {
                    FormatError::new(format!("Can't parse attribute=value: `{token}'"))
                })?;

            let value = if value.contains(',') {
                AttrValue::from_values(value.split(',').map(|v| unescape(v).into_owned()))
            } else {
                AttrValue::from(unescape(value).into_owned())
            };

            attrs
                .add(&unescape(name), value, Some(cache))
                .map_err(|e| FormatError::new(e.to_string()))?;
        }
        Ok(attrs)
    }

    fn format_attrs(&self, attrs: &AttrSet) -> String {
        let mut line = String::with_capacity(attrs.len() * 32);
        for attr in attrs.iter() {
            if !line.is_empty() {
                line.push(';');
            }
            line.push_str(&escape_attr(attr.name()));
            line.push('=');
            for (idx, value) in attr.values().enumerate() {
                if idx > 0 {
                    line.push(',');
                }
                line.push_str(&escape_attr(value));
            }
        }
        line
    }

    fn format_record(&self, record: &GxfRecord) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            escape_seqname(record.seqname()),
            escape_column(record.source()),
            escape_column(record.feature()),
            record.start(),
            record.end(),
            escape_column(&or_dot(record.score())),
            escape_column(&or_dot(record.strand())),
            escape_column(&or_dot(record.phase())),
            self.format_attrs(record.attrs()),
        )
    }
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

#[inline(always)]
fn seqname_ok(c: char) -> bool {
    c.is_ascii_alphanumeric() || ".:^*$@!+_?|-".contains(c)
}

#[inline(always)]
fn seqname_keep(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_.-~".contains(c)
}

#[inline(always)]
fn column_keep(c: char) -> bool {
    !(c.is_ascii_control() || c == '%')
}

#[inline(always)]
fn attr_keep(c: char) -> bool {
    column_keep(c) && !matches!(c, ';' | '=' | '&' | ',')
}

fn percent_encode(value: &str, keep: fn(char) -> bool) -> Cow<'_, str> {
    if value.chars().all(keep) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    let mut buf = [0u8; 4];
    for c in value.chars() {
        if keep(c) {
            out.push(c);
        } else {
            for b in c.encode_utf8(&mut buf).bytes() {
                out.push('%');
                out.push(HEX[(b >> 4) as usize] as char);
                out.push(HEX[(b & 0x0f) as usize] as char);
            }
        }
    }
    Cow::Owned(out)
}

/// Escapes column 1.
pub fn escape_seqname(value: &str) -> Cow<'_, str> {
    if value.chars().all(seqname_ok) {
        Cow::Borrowed(value)
    } else {
        percent_encode(value, seqname_keep)
    }
}

/// Escapes columns 2 through 8.
pub fn escape_column(value: &str) -> Cow<'_, str> {
    percent_encode(value, column_keep)
}

/// Escapes an attribute name or a single attribute value.
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    percent_encode(value, attr_keep)
}

#[inline(always)]
fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Decodes `%XX` escapes. A `%` not followed by two hex digits is kept as-is
/// and invalid UTF-8 is replaced with U+FFFD.
pub fn unescape(value: &str) -> Cow<'_, str> {
    if !value.contains('%') {
        return Cow::Borrowed(value);
    }

    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' && idx + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_val(bytes[idx + 1]), hex_val(bytes[idx + 2])) {
                out.push((hi << 4) | lo);
                idx += 3;
                continue;
            }
        }
        out.push(bytes[idx]);
        idx += 1;
    }

    match String::from_utf8(out) {
        Ok(decoded) => Cow::Owned(decoded),
        Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}
