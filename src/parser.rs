//! MSRP message parser
//!
//! Frames one message out of a buffer and decomposes it. The parse runs in
//! four stages: classify the start line, locate the end-line and parse the
//! header block in front of it, parse the end-line, then assemble the
//! result. Only the first two stages can reject the buffer.
//!
//! A parser owns a frozen [`BodyHandlerRegistry`] and is `Send + Sync`, so
//! one instance can be shared by any number of threads.

use crate::body::{dispatch_body, global_registry, render_raw, BodyHandlerRegistry};
use crate::config::ParserConfig;
use crate::end_line::{find_end_line, parse_end_line};
use crate::error::{MsrpError, MsrpResult};
use crate::headers::parse_headers;
use crate::line::find_line_end;
use crate::sink::{emit_message, FieldSink};
use crate::start_line::classify_start;
use crate::types::{Body, Diagnostic, HeaderKind, ParsedMessage, TextRange};
use crate::validation::check_transaction_ids;
use std::sync::Arc;
use tracing::{debug, trace};

/// MSRP message parser
#[derive(Debug, Clone)]
pub struct MsrpParser {
    config: ParserConfig,
    registry: Arc<BodyHandlerRegistry>,
}

impl Default for MsrpParser {
    /// Default configuration with the process-wide registry
    fn default() -> Self {
        Self::new(ParserConfig::default(), global_registry())
    }
}

impl MsrpParser {
    pub fn new(config: ParserConfig, registry: Arc<BodyHandlerRegistry>) -> Self {
        Self { config, registry }
    }

    /// Default configuration with a dedicated registry
    pub fn with_registry(registry: BodyHandlerRegistry) -> Self {
        Self::new(ParserConfig::default(), Arc::new(registry))
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn registry(&self) -> &BodyHandlerRegistry {
        &self.registry
    }

    /// Parse the message at the start of `buffer`
    ///
    /// Bytes after the end-line are ignored; `total_len` on the result says
    /// how many bytes the message occupies.
    ///
    /// # Examples
    /// ```
    /// use msrp_parse::{MsrpParser, BodyHandlerRegistry, ContinuationFlag};
    ///
    /// let parser = MsrpParser::with_registry(BodyHandlerRegistry::new());
    /// let buffer = b"MSRP a786hjs2 SEND\r\nTo-Path: msrp://b.example:7654/ghi\r\n\r\n-------a786hjs2$\r\n";
    ///
    /// let message = parser.try_parse(buffer).unwrap();
    /// assert_eq!(message.transaction_id(), "a786hjs2");
    /// assert_eq!(message.start_line.method(), Some("SEND"));
    /// assert!(message.body.is_none());
    /// assert_eq!(message.continuation_flag(), ContinuationFlag::End);
    /// assert_eq!(message.total_len, buffer.len());
    /// ```
    pub fn try_parse<'a>(&self, buffer: &'a [u8]) -> MsrpResult<ParsedMessage<'a>> {
        // Start line
        let start_line = classify_start(buffer).map_err(|err| {
            debug!(len = buffer.len(), "buffer is not an MSRP message");
            err
        })?;
        let headers_start = match find_line_end(buffer, 0) {
            Some(line_end) => line_end.next,
            None => return Err(incomplete(&start_line.transaction_id, buffer.len())),
        };

        // Headers or body, up to the end-line
        let end_offset = match find_end_line(buffer, headers_start) {
            Some(offset) => offset,
            None => return Err(incomplete(&start_line.transaction_id, buffer.len())),
        };
        let block = parse_headers(buffer, headers_start, end_offset);
        let mut diagnostics = block.diagnostics;

        if let Some(content_type) = &block.content_type {
            if content_type.is_degenerate() {
                let value = block
                    .fields
                    .iter()
                    .rev()
                    .find(|field| field.kind() == Some(HeaderKind::ContentType))
                    .map(|field| field.raw_value.to_string())
                    .unwrap_or_default();
                debug!(value = %value, "degenerate Content-Type, media type treated as absent");
                diagnostics.push(Diagnostic::DegenerateContentType { value });
            }
        }

        let body = match block.body_start {
            Some(body_start) if body_start < end_offset => {
                let range = TextRange::new(body_start, end_offset);
                let bytes = range.slice(buffer);
                let rendering = if self.config.dispatch_bodies {
                    let content_type = block.content_type.as_ref();
                    let dispatch = dispatch_body(
                        content_type.and_then(|ct| ct.lookup_key()),
                        content_type.and_then(|ct| ct.parameters.as_deref()),
                        bytes,
                        &self.registry,
                    );
                    diagnostics.extend(dispatch.failure);
                    dispatch.rendering
                } else {
                    render_raw(bytes)
                };
                Some(Body {
                    bytes,
                    range,
                    rendering,
                })
            }
            _ => None,
        };

        // End line
        let (end_line, total_len) = match parse_end_line(buffer, end_offset) {
            Some(parsed) => parsed,
            None => return Err(incomplete(&start_line.transaction_id, buffer.len())),
        };
        trace!(
            transaction_id = %start_line.transaction_id,
            total_len,
            headers = block.fields.len(),
            "message framed"
        );

        // Done
        let mut message = ParsedMessage {
            start_line,
            headers: block.fields,
            header_block: block.range,
            content_type: block.content_type,
            body,
            end_line,
            total_len,
            diagnostics,
        };
        check_transaction_ids(&mut message);
        Ok(message)
    }

    /// Parse `buffer` and report its structure to `sink`
    ///
    /// Nothing is emitted when the parse fails.
    pub fn dissect<'a>(&self, buffer: &'a [u8], sink: &mut dyn FieldSink) -> MsrpResult<ParsedMessage<'a>> {
        let message = self.try_parse(buffer)?;
        emit_message(&message, buffer, &self.config, sink);
        Ok(message)
    }
}

/// Parse with the default configuration and the process-wide registry
pub fn try_parse(buffer: &[u8]) -> MsrpResult<ParsedMessage<'_>> {
    MsrpParser::default().try_parse(buffer)
}

fn incomplete(transaction_id: &str, scanned: usize) -> MsrpError {
    debug!(transaction_id, scanned, "no end-line found, message incomplete");
    MsrpError::incomplete(transaction_id, scanned)
}
