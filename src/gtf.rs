use crate::error::FormatError;
use crate::gxf::{or_dot, split_attr_column, AttrCache, AttrSet, Dialect, Format, GxfRecord};

/// GTF dialect: `name "value";` and `name 123;` attributes.
///
/// The grammar has no escaping, so a quoted value holding `;` or `"` cannot
/// be represented and is rejected or mis-split on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gtf;

impl Dialect for Gtf {
    fn format(&self) -> Format {
        Format::Gtf
    }

    fn parse_attrs(&self, column: &str, cache: &mut AttrCache) -> Result<AttrSet, FormatError> {
        let mut attrs = AttrSet::new();
        for token in split_attr_column(column) {
            let (name, value) = split_attr_val(token).ok_or_else(|| {
                FormatError::new(format!("Can't parse attribute/value: `{token}'"))
            })?;
            attrs
                .add(name, value, Some(cache))
                .map_err(|e| FormatError::new(e.to_string()))?;
        }
        Ok(attrs)
    }

    fn format_attrs(&self, attrs: &AttrSet) -> String {
        let mut line = String::with_capacity(attrs.len() * 32);
        for attr in attrs.iter() {
            for value in attr.values() {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(attr.name());
                line.push(' ');
                if is_number(value) {
                    line.push_str(value);
                } else {
                    line.push('"');
                    line.push_str(value);
                    line.push('"');
                }
                line.push(';');
            }
        }
        line
    }

    fn format_record(&self, record: &GxfRecord) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            record.seqname(),
            record.source(),
            record.feature(),
            record.start(),
            record.end(),
            or_dot(record.score()),
            or_dot(record.strand()),
            or_dot(record.phase()),
            self.format_attrs(record.attrs()),
        )
    }
}

#[inline(always)]
fn is_number(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Matches `name "string"` or `name number`, the number form taking
/// precedence. The name is `[A-Za-z_]+` followed by at least one space.
fn split_attr_val(token: &str) -> Option<(&str, &str)> {
    let name_len = token
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic() || *b == b'_')
        .count();
    if name_len == 0 {
        return None;
    }

    let (name, rest) = token.split_at(name_len);
    let value = rest.trim_start_matches(' ');
    if value.len() == rest.len() {
        return None;
    }

    if is_number(value) {
        return Some((name, value));
    }

    let inner = value.strip_prefix('"')?.strip_suffix('"')?;
    if inner.is_empty() {
        return None;
    }
    Some((name, inner))
}
