//! Common types used throughout the MSRP parser
//!
//! Every parsed entity borrows from the caller's buffer: textual fields are
//! `Cow<'a, str>` (borrowed when the bytes are valid UTF-8) and every entity
//! keeps the `TextRange` it was read from so a renderer can highlight it.

use std::borrow::Cow;
use std::fmt;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Represents a range of bytes within a message buffer for zero-copy parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    /// Create a new TextRange
    pub fn new(start: usize, end: usize) -> Self {
        TextRange { start, end }
    }

    /// Get the bytes this range covers
    pub fn slice<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        &buffer[self.start..self.end]
    }

    /// Get the text this range covers, replacing invalid UTF-8
    pub fn text<'a>(&self, buffer: &'a [u8]) -> Cow<'a, str> {
        String::from_utf8_lossy(self.slice(buffer))
    }

    /// Get the length of this range
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if this range is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Shift a range that is relative to `base` into buffer coordinates
    pub fn offset_by(&self, base: usize) -> Self {
        TextRange::new(self.start + base, self.end + base)
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Header names with a defined meaning in MSRP
///
/// Matching is exact apart from ASCII case, so `to-path` and `TO-PATH` both
/// resolve to [`HeaderKind::ToPath`] while `To-Path ` does not.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum HeaderKind {
    #[strum(serialize = "From-Path")]
    FromPath,
    #[strum(serialize = "To-Path")]
    ToPath,
    #[strum(serialize = "Message-ID")]
    MessageId,
    #[strum(serialize = "Success-Report")]
    SuccessReport,
    #[strum(serialize = "Byte-Range")]
    ByteRange,
    #[strum(serialize = "Status")]
    Status,
    #[strum(serialize = "Content-Type")]
    ContentType,
    #[strum(serialize = "Content-ID")]
    ContentId,
    #[strum(serialize = "Content-Description")]
    ContentDescription,
    #[strum(serialize = "Content-Disposition")]
    ContentDisposition,
}

/// Header classification after name recognition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderName {
    Known(HeaderKind),
    Unknown,
}

impl HeaderName {
    pub fn kind(&self) -> Option<HeaderKind> {
        match self {
            HeaderName::Known(kind) => Some(*kind),
            HeaderName::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, HeaderName::Known(_))
    }
}

/// Kind of start line: request with a method, or response with a status code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartKind<'a> {
    Request {
        method: Cow<'a, str>,
        method_range: TextRange,
    },
    Response {
        /// Exactly three ASCII digits
        status_code: Cow<'a, str>,
        status_range: TextRange,
        phrase: Option<Cow<'a, str>>,
    },
}

/// The first line of an MSRP message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartLine<'a> {
    pub transaction_id: Cow<'a, str>,
    pub transaction_range: TextRange,
    pub kind: StartKind<'a>,
    /// Line content, terminator excluded
    pub line_range: TextRange,
}

impl<'a> StartLine<'a> {
    pub fn is_request(&self) -> bool {
        matches!(self.kind, StartKind::Request { .. })
    }

    pub fn is_response(&self) -> bool {
        !self.is_request()
    }

    pub fn method(&self) -> Option<&str> {
        match &self.kind {
            StartKind::Request { method, .. } => Some(method.as_ref()),
            StartKind::Response { .. } => None,
        }
    }

    pub fn status_code(&self) -> Option<&str> {
        match &self.kind {
            StartKind::Response { status_code, .. } => Some(status_code.as_ref()),
            StartKind::Request { .. } => None,
        }
    }

    /// Status code as a number, when this is a response
    pub fn status(&self) -> Option<u16> {
        self.status_code().and_then(|code| code.parse().ok())
    }

    pub fn phrase(&self) -> Option<&str> {
        match &self.kind {
            StartKind::Response { phrase, .. } => phrase.as_deref(),
            StartKind::Request { .. } => None,
        }
    }
}

impl fmt::Display for StartLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StartKind::Request { method, .. } => write!(f, "Request: {} ", method)?,
            StartKind::Response {
                status_code,
                phrase,
                ..
            } => {
                write!(f, "Response: {} ", status_code)?;
                if let Some(phrase) = phrase {
                    write!(f, "{} ", phrase)?;
                }
            }
        }
        write!(f, "Transaction ID: {}", self.transaction_id)
    }
}

/// One header line from the header block
///
/// Every line between the start line and the blank separator (or the
/// end-line) becomes a `HeaderField`, including malformed lines without a
/// colon, so that nothing on the wire is lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField<'a> {
    pub name: HeaderName,
    /// Text before the colon; the whole line when there is no colon
    pub raw_name: Cow<'a, str>,
    /// Text after the colon with leading SP/HTAB removed; empty when malformed
    pub raw_value: Cow<'a, str>,
    pub value_range: TextRange,
    /// Line content, terminator excluded
    pub line_range: TextRange,
    /// Whether the line contained a colon
    pub well_formed: bool,
}

impl HeaderField<'_> {
    pub fn kind(&self) -> Option<HeaderKind> {
        self.name.kind()
    }
}

/// Media type and parameters taken from a Content-Type value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType {
    /// Lower-cased media type used for handler lookup
    pub media_type: String,
    pub parameters: Option<String>,
}

/// Continuation flag carried by the end-line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContinuationFlag {
    /// `+`: more chunks of this message follow
    Continue,
    /// `$`: last chunk
    End,
    /// `#`: message aborted
    Abort,
    /// Any other byte; flag semantics are left to the session layer
    Other(u8),
}

impl ContinuationFlag {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'+' => ContinuationFlag::Continue,
            b'$' => ContinuationFlag::End,
            b'#' => ContinuationFlag::Abort,
            other => ContinuationFlag::Other(other),
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            ContinuationFlag::Continue => b'+',
            ContinuationFlag::End => b'$',
            ContinuationFlag::Abort => b'#',
            ContinuationFlag::Other(byte) => *byte,
        }
    }

    pub fn as_char(&self) -> char {
        self.as_byte() as char
    }
}

impl fmt::Display for ContinuationFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The terminating line of an MSRP message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndLine<'a> {
    pub transaction_id: Cow<'a, str>,
    pub transaction_range: TextRange,
    pub continuation_flag: ContinuationFlag,
    pub flag_offset: usize,
    /// Line content, terminator excluded
    pub line_range: TextRange,
}

/// A single rendered item produced by a body handler
///
/// `range` is relative to the start of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyItem {
    pub label: String,
    pub value: String,
    pub range: TextRange,
}

impl BodyItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>, range: TextRange) -> Self {
        BodyItem {
            label: label.into(),
            value: value.into(),
            range,
        }
    }
}

/// How a body ended up being represented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyRendering {
    /// A registered handler accepted the body
    Handled {
        media_type: String,
        handler: &'static str,
        items: Vec<BodyItem>,
    },
    /// Line-by-line opaque text; ranges are relative to the start of the body
    Raw { lines: Vec<TextRange> },
}

impl BodyRendering {
    pub fn is_raw(&self) -> bool {
        matches!(self, BodyRendering::Raw { .. })
    }
}

/// Message body with its rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body<'a> {
    pub bytes: &'a [u8],
    pub range: TextRange,
    pub rendering: BodyRendering,
}

impl<'a> Body<'a> {
    /// Raw lines of the body as text, empty if a handler rendered it
    pub fn raw_lines(&self) -> Vec<Cow<'a, str>> {
        match &self.rendering {
            BodyRendering::Raw { lines } => lines.iter().map(|line| line.text(self.bytes)).collect(),
            BodyRendering::Handled { .. } => Vec::new(),
        }
    }

    pub fn text(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes)
    }
}

/// Non-fatal observations recorded while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A header line without a colon; retained verbatim
    MalformedHeaderLine { line: TextRange },
    /// A header name outside the known table; retained as opaque
    UnknownHeaderName { name: String, line: TextRange },
    /// Content-Type value with an empty media type
    DegenerateContentType { value: String },
    /// A registered handler failed or declined; the body fell back to raw text
    HandlerFailure { media_type: String, reason: String },
    /// End-line transaction id differs from the start line's
    TransactionIdMismatch { start: String, end: String },
}

/// A fully framed and decomposed MSRP message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage<'a> {
    pub start_line: StartLine<'a>,
    /// Wire order; names are not required to be unique
    pub headers: Vec<HeaderField<'a>>,
    /// Covers the header lines and, when present, the blank separator
    pub header_block: TextRange,
    pub content_type: Option<ContentType>,
    pub body: Option<Body<'a>>,
    pub end_line: EndLine<'a>,
    /// Offset just past the end-line's terminator
    pub total_len: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> ParsedMessage<'a> {
    pub fn transaction_id(&self) -> &str {
        &self.start_line.transaction_id
    }

    pub fn is_request(&self) -> bool {
        self.start_line.is_request()
    }

    /// First header of the given kind
    pub fn header(&self, kind: HeaderKind) -> Option<&HeaderField<'a>> {
        self.headers.iter().find(|h| h.kind() == Some(kind))
    }

    /// Value of the first header of the given kind
    pub fn header_value(&self, kind: HeaderKind) -> Option<&str> {
        self.header(kind).map(|h| &*h.raw_value)
    }

    /// All headers whose raw name matches, ignoring ASCII case
    pub fn headers_named(&self, name: &str) -> Vec<&HeaderField<'a>> {
        self.headers
            .iter()
            .filter(|h| h.well_formed && h.raw_name.eq_ignore_ascii_case(name))
            .collect()
    }

    pub fn continuation_flag(&self) -> ContinuationFlag {
        self.end_line.continuation_flag
    }

    /// One-line summary as shown in a packet list
    pub fn summary(&self) -> String {
        self.start_line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_header_kind_round_trips_through_display() {
        for kind in HeaderKind::iter() {
            let name = kind.to_string();
            assert_eq!(HeaderKind::from_str(&name), Ok(kind));
            assert_eq!(HeaderKind::from_str(&name.to_lowercase()), Ok(kind));
            assert_eq!(HeaderKind::from_str(&name.to_uppercase()), Ok(kind));
        }
        assert_eq!(HeaderKind::iter().count(), 10);
    }

    #[test]
    fn test_continuation_flag_bytes() {
        assert_eq!(ContinuationFlag::from_byte(b'+'), ContinuationFlag::Continue);
        assert_eq!(ContinuationFlag::from_byte(b'$'), ContinuationFlag::End);
        assert_eq!(ContinuationFlag::from_byte(b'#'), ContinuationFlag::Abort);
        assert_eq!(ContinuationFlag::from_byte(b'x'), ContinuationFlag::Other(b'x'));
        assert_eq!(ContinuationFlag::Other(b'x').as_char(), 'x');
        assert_eq!(ContinuationFlag::End.to_string(), "$");
    }

    #[test]
    fn test_text_range_helpers() {
        let buffer = b"MSRP abc SEND";
        let range = TextRange::new(5, 8);
        assert_eq!(range.slice(buffer), b"abc");
        assert_eq!(range.text(buffer), "abc");
        assert_eq!(range.len(), 3);
        assert!(!range.is_empty());
        assert_eq!(range.offset_by(2), TextRange::new(7, 10));
        assert_eq!(range.to_string(), "5..8");
    }
}
