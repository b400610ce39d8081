//! Field sink and field identifier table
//!
//! A presentation layer (tree view, logger, test) receives parsed structure
//! as a flat, wire-ordered stream of [`FieldRecord`]s through the
//! [`FieldSink`] trait. `depth` expresses nesting: the message is depth 0,
//! the start line, header block, data and end-line are depth 1, and their
//! parts are depth 2.

use crate::config::ParserConfig;
use crate::line::Lines;
use crate::types::{BodyRendering, HeaderKind, ParsedMessage, StartKind, TextRange};
use std::borrow::Cow;
use strum::EnumProperty;
use strum_macros::{EnumIter, EnumProperty};

/// Identifiers of every field the parser can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumProperty)]
pub enum FieldId {
    #[strum(props(name = "Message Session Relay Protocol", abbrev = "msrp"))]
    Message,
    #[strum(props(name = "Request Line", abbrev = "msrp.request.line"))]
    RequestLine,
    #[strum(props(name = "Response Line", abbrev = "msrp.response.line"))]
    ResponseLine,
    #[strum(props(name = "Transaction Id", abbrev = "msrp.transaction.id"))]
    TransactionId,
    #[strum(props(name = "Method", abbrev = "msrp.method"))]
    Method,
    #[strum(props(name = "Status code", abbrev = "msrp.status.code"))]
    StatusCode,
    #[strum(props(name = "Message Header", abbrev = "msrp.msg.hdr"))]
    MessageHeader,
    #[strum(props(name = "From Path", abbrev = "msrp.from.path"))]
    FromPath,
    #[strum(props(name = "To Path", abbrev = "msrp.to.path"))]
    ToPath,
    #[strum(props(name = "Message ID", abbrev = "msrp.messageid"))]
    MessageId,
    #[strum(props(name = "Success Report", abbrev = "msrp.success.report"))]
    SuccessReport,
    #[strum(props(name = "Byte Range", abbrev = "msrp.byte.range"))]
    ByteRange,
    #[strum(props(name = "Status", abbrev = "msrp.status"))]
    Status,
    #[strum(props(name = "Content-Type", abbrev = "msrp.content.type"))]
    ContentType,
    #[strum(props(name = "Content-ID", abbrev = "msrp.content.id"))]
    ContentId,
    #[strum(props(name = "Content-Description", abbrev = "msrp.content.description"))]
    ContentDescription,
    #[strum(props(name = "Content-Disposition", abbrev = "msrp.content.disposition"))]
    ContentDisposition,
    #[strum(props(name = "Data", abbrev = "msrp.data"))]
    Data,
    #[strum(props(name = "End Line", abbrev = "msrp.end.line"))]
    EndLine,
    #[strum(props(name = "Continuation-flag", abbrev = "msrp.cnt.flg"))]
    ContinuationFlag,
    /// Opaque text: unknown header lines, raw body lines, handler output
    #[strum(props(name = "Text", abbrev = "msrp.text"))]
    Text,
    #[strum(props(name = "Message Session Relay Protocol (as raw text)", abbrev = "msrp.raw"))]
    RawText,
}

impl FieldId {
    /// Human-readable field name
    pub fn name(&self) -> &'static str {
        self.get_str("name").unwrap_or("")
    }

    /// Filter abbreviation, e.g. `msrp.method`
    pub fn abbrev(&self) -> &'static str {
        self.get_str("abbrev").unwrap_or("")
    }

    /// Field carrying the value of a known header
    pub fn for_header(kind: HeaderKind) -> Self {
        match kind {
            HeaderKind::FromPath => FieldId::FromPath,
            HeaderKind::ToPath => FieldId::ToPath,
            HeaderKind::MessageId => FieldId::MessageId,
            HeaderKind::SuccessReport => FieldId::SuccessReport,
            HeaderKind::ByteRange => FieldId::ByteRange,
            HeaderKind::Status => FieldId::Status,
            HeaderKind::ContentType => FieldId::ContentType,
            HeaderKind::ContentId => FieldId::ContentId,
            HeaderKind::ContentDescription => FieldId::ContentDescription,
            HeaderKind::ContentDisposition => FieldId::ContentDisposition,
        }
    }
}

/// One structured fact about a parsed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRecord<'a> {
    pub field: FieldId,
    /// Absolute range in the message buffer
    pub range: TextRange,
    pub value: Cow<'a, str>,
    pub depth: usize,
}

impl FieldRecord<'_> {
    pub fn into_owned(self) -> FieldRecord<'static> {
        FieldRecord {
            field: self.field,
            range: self.range,
            value: Cow::Owned(self.value.into_owned()),
            depth: self.depth,
        }
    }
}

/// Receiver of parsed structure
pub trait FieldSink {
    fn record(&mut self, record: FieldRecord<'_>);
}

/// Sink that keeps every record
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub records: Vec<FieldRecord<'static>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// First record for a field
    pub fn find(&self, field: FieldId) -> Option<&FieldRecord<'static>> {
        self.records.iter().find(|r| r.field == field)
    }

    /// Values of every record for a field, in emission order
    pub fn values(&self, field: FieldId) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.field == field)
            .map(|r| &*r.value)
            .collect()
    }
}

impl FieldSink for RecordingSink {
    fn record(&mut self, record: FieldRecord<'_>) {
        self.records.push(record.into_owned());
    }
}

/// Emit every structural fact of `message` to `sink` in wire order
pub fn emit_message<'a>(
    message: &ParsedMessage<'a>,
    buffer: &'a [u8],
    config: &ParserConfig,
    sink: &mut dyn FieldSink,
) {
    let mut emit = |field: FieldId, range: TextRange, value: Cow<'_, str>, depth: usize| {
        sink.record(FieldRecord {
            field,
            range,
            value,
            depth,
        })
    };

    let whole = TextRange::new(0, message.total_len);
    emit(FieldId::Message, whole, message.summary().into(), 0);

    // Start line
    let start = &message.start_line;
    let line_field = match start.kind {
        StartKind::Request { .. } => FieldId::RequestLine,
        StartKind::Response { .. } => FieldId::ResponseLine,
    };
    emit(line_field, start.line_range, start.line_range.text(buffer), 1);
    emit(
        FieldId::TransactionId,
        start.transaction_range,
        start.transaction_id.clone(),
        2,
    );
    match &start.kind {
        StartKind::Request {
            method,
            method_range,
        } => emit(FieldId::Method, *method_range, method.clone(), 2),
        StartKind::Response {
            status_code,
            status_range,
            ..
        } => emit(FieldId::StatusCode, *status_range, status_code.clone(), 2),
    }

    // Known headers carry their value; anything else keeps the wire line
    emit(FieldId::MessageHeader, message.header_block, "".into(), 1);
    for header in &message.headers {
        match header.kind() {
            Some(kind) => emit(FieldId::for_header(kind), header.line_range, header.raw_value.clone(), 2),
            None => emit(FieldId::Text, header.line_range, header.line_range.text(buffer), 2),
        }
    }

    // Body
    if let Some(body) = &message.body {
        emit(FieldId::Data, body.range, "".into(), 1);
        match &body.rendering {
            BodyRendering::Handled { items, .. } => {
                for item in items {
                    emit(
                        FieldId::Text,
                        item.range.offset_by(body.range.start),
                        format!("{}: {}", item.label, item.value).into(),
                        2,
                    );
                }
            }
            BodyRendering::Raw { lines } => {
                for line in lines {
                    emit(
                        FieldId::Text,
                        line.offset_by(body.range.start),
                        line.text(body.bytes),
                        2,
                    );
                }
            }
        }
    }

    // End line
    let end = &message.end_line;
    emit(FieldId::EndLine, end.line_range, end.line_range.text(buffer), 1);
    emit(
        FieldId::TransactionId,
        end.transaction_range,
        end.transaction_id.clone(),
        2,
    );
    emit(
        FieldId::ContinuationFlag,
        TextRange::new(end.flag_offset, end.flag_offset + 1),
        end.continuation_flag.to_string().into(),
        2,
    );

    if config.display_raw_text {
        let raw = &buffer[..message.total_len];
        emit(FieldId::RawText, whole, "".into(), 0);
        for line in Lines::new(raw) {
            emit(FieldId::Text, line.range, line.range.text(raw), 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_field_table_is_complete() {
        let mut abbrevs = HashSet::new();
        for field in FieldId::iter() {
            assert!(!field.name().is_empty(), "{:?} has no name", field);
            assert!(field.abbrev().starts_with("msrp"), "{:?} has a bad abbrev", field);
            assert!(abbrevs.insert(field.abbrev()), "{:?} reuses an abbrev", field);
        }
    }

    #[test]
    fn test_every_header_kind_has_a_field() {
        for kind in HeaderKind::iter() {
            let field = FieldId::for_header(kind);
            assert_eq!(field.name().replace(' ', "-"), kind.to_string().replace(' ', "-"));
        }
    }

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::new();
        let owned = String::from("SEND");
        sink.record(FieldRecord {
            field: FieldId::Method,
            range: TextRange::new(14, 18),
            value: owned.as_str().into(),
            depth: 2,
        });
        drop(owned);
        assert_eq!(sink.values(FieldId::Method), vec!["SEND"]);
        assert_eq!(sink.find(FieldId::Method).map(|r| r.depth), Some(2));
        assert!(sink.find(FieldId::EndLine).is_none());
    }
}
