//! MSRP header recognition and header block parsing
//!
//! Header lines are kept verbatim and in wire order. Only the ten header
//! names defined for MSRP get a [`HeaderKind`]; everything else, including
//! lines without a colon, is retained as an opaque entry.

use crate::content_type::extract_content_type;
use crate::limits::{HEADER_COLON, HTAB, SP};
use crate::line::find_line_end;
use crate::types::{ContentType, Diagnostic, HeaderField, HeaderKind, HeaderName, TextRange};
use std::str::FromStr;
use tracing::trace;

/// Map a header name to a known kind, ignoring ASCII case
///
/// # Examples
/// ```
/// use msrp_parse::headers::recognize;
/// use msrp_parse::{HeaderKind, HeaderName};
///
/// assert_eq!(recognize("to-path"), HeaderName::Known(HeaderKind::ToPath));
/// assert_eq!(recognize("X-Custom"), HeaderName::Unknown);
/// ```
pub fn recognize(name: &str) -> HeaderName {
    HeaderKind::from_str(name)
        .map(HeaderName::Known)
        .unwrap_or(HeaderName::Unknown)
}

/// Byte-level variant of [`recognize`]; names that are not UTF-8 are unknown
pub fn recognize_bytes(name: &[u8]) -> HeaderName {
    std::str::from_utf8(name)
        .map(recognize)
        .unwrap_or(HeaderName::Unknown)
}

/// Result of parsing the header block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock<'a> {
    pub fields: Vec<HeaderField<'a>>,
    /// Offset of the first body byte when a blank separator line was found
    pub body_start: Option<usize>,
    /// Parsed from the last Content-Type header in the block
    pub content_type: Option<ContentType>,
    pub diagnostics: Vec<Diagnostic>,
    /// Header lines plus the blank separator line when present
    pub range: TextRange,
}

/// Parse header lines from `start` until a blank line or `end`
///
/// `end` is the offset of the end-line. When a blank line is found the body
/// starts right after it; when `end` is reached first there is no body.
pub fn parse_headers(buffer: &[u8], start: usize, end: usize) -> HeaderBlock<'_> {
    let mut block = HeaderBlock {
        fields: Vec::new(),
        body_start: None,
        content_type: None,
        diagnostics: Vec::new(),
        range: TextRange::new(start, start),
    };

    let mut offset = start;
    while offset < end {
        let line_end = match find_line_end(buffer, offset) {
            Some(line_end) => line_end,
            None => break,
        };
        if line_end.len == 0 {
            trace!(offset, "blank line separates headers from body");
            block.body_start = Some(line_end.next);
            offset = line_end.next;
            break;
        }

        let line_range = TextRange::new(offset, offset + line_end.len);
        let field = parse_header_line(buffer, line_range);

        if !field.well_formed {
            block
                .diagnostics
                .push(Diagnostic::MalformedHeaderLine { line: line_range });
        } else if !field.name.is_known() {
            block.diagnostics.push(Diagnostic::UnknownHeaderName {
                name: field.raw_name.to_string(),
                line: line_range,
            });
        } else if field.kind() == Some(HeaderKind::ContentType) {
            block.content_type = Some(extract_content_type(&field.raw_value));
        }

        block.fields.push(field);
        offset = line_end.next;
    }

    block.range.end = offset.min(end);
    block
}

/// Split one header line into name and value
fn parse_header_line(buffer: &[u8], line_range: TextRange) -> HeaderField<'_> {
    let line = line_range.slice(buffer);

    let colon_pos = match line.iter().position(|&b| b == HEADER_COLON) {
        Some(pos) => pos,
        None => {
            return HeaderField {
                name: HeaderName::Unknown,
                raw_name: line_range.text(buffer),
                raw_value: "".into(),
                value_range: TextRange::new(line_range.end, line_range.end),
                line_range,
                well_formed: false,
            };
        }
    };

    let name_range = TextRange::new(line_range.start, line_range.start + colon_pos);

    // Skip leading whitespace; trailing whitespace is part of the value
    let mut value_start = name_range.end + 1;
    while value_start < line_range.end && matches!(buffer[value_start], SP | HTAB) {
        value_start += 1;
    }
    let value_range = TextRange::new(value_start, line_range.end);

    HeaderField {
        name: recognize_bytes(name_range.slice(buffer)),
        raw_name: name_range.text(buffer),
        raw_value: value_range.text(buffer),
        value_range,
        line_range,
        well_formed: true,
    }
}
