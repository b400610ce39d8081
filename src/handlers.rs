//! Built-in body handlers for the media types MSRP sessions usually carry
//!
//! Plain text and CPIM (RFC 3862) wrapped instant messages.

use crate::body::{BodyHandler, BodyHandlerRegistry};
use crate::content_type::extract_parameter;
use crate::error::HandlerError;
use crate::line::Lines;
use crate::types::{BodyItem, TextRange};

pub const TEXT_PLAIN: &str = "text/plain";
pub const MESSAGE_CPIM: &str = "message/cpim";

/// Register every built-in handler
pub fn register_builtin_handlers(registry: &mut BodyHandlerRegistry) {
    registry.register_body_handler(TEXT_PLAIN, TextPlainHandler);
    registry.register_body_handler(MESSAGE_CPIM, CpimHandler);
}

/// `text/plain` bodies, one item per line
#[derive(Debug, Default, Clone, Copy)]
pub struct TextPlainHandler;

impl BodyHandler for TextPlainHandler {
    fn name(&self) -> &'static str {
        "text"
    }

    fn handle(&self, body: &[u8], parameters: Option<&str>) -> Result<Vec<BodyItem>, HandlerError> {
        if let Some(charset) = parameters.and_then(|p| extract_parameter(p, "charset")) {
            if !charset.eq_ignore_ascii_case("utf-8") && !charset.eq_ignore_ascii_case("us-ascii") {
                return Err(HandlerError::declined(format!("charset {}", charset)));
            }
        }
        let text = std::str::from_utf8(body).map_err(|e| HandlerError::failed(format!("invalid UTF-8: {}", e)))?;

        Ok(Lines::new(body)
            .map(|line| {
                BodyItem::new(
                    "Line",
                    &text[line.range.start..line.range.end],
                    line.range,
                )
            })
            .collect())
    }
}

/// `message/cpim` bodies
///
/// ```text
/// From: MR SANDERS <im:piglet@100akerwood.com>
/// To: Depressed Donkey <im:eeyore@100akerwood.com>
/// DateTime: 2000-12-13T13:40:00-08:00
///
/// Content-Type: text/plain
///
/// Hello
/// ```
///
/// Yields the message headers, then the encapsulated MIME headers, then
/// the encapsulated content as one item labelled `Content`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpimHandler;

impl BodyHandler for CpimHandler {
    fn name(&self) -> &'static str {
        "cpim"
    }

    fn handle(&self, body: &[u8], _parameters: Option<&str>) -> Result<Vec<BodyItem>, HandlerError> {
        let mut items = Vec::new();
        let mut lines = Lines::new(body);

        read_header_section(body, &mut lines, &mut items, "message headers")?;
        let content_start = read_header_section(body, &mut lines, &mut items, "content headers")?;

        let content = TextRange::new(content_start, body.len());
        if !content.is_empty() {
            items.push(BodyItem::new("Content", content.text(body), content));
        }
        Ok(items)
    }
}

/// Read `Name: value` lines up to a blank line, returning the offset after it
fn read_header_section(
    body: &[u8],
    lines: &mut Lines<'_>,
    items: &mut Vec<BodyItem>,
    section: &str,
) -> Result<usize, HandlerError> {
    for line in lines.by_ref() {
        if line.range.is_empty() && line.terminated {
            return Ok(line.next);
        }
        let text = line.range.text(body);
        let (name, value) = text
            .split_once(':')
            .ok_or_else(|| HandlerError::failed(format!("{} line without colon: {}", section, text)))?;
        items.push(BodyItem::new(
            name,
            value.trim_start_matches([' ', '\t']),
            line.range,
        ));
    }
    Err(HandlerError::failed(format!("{} not terminated by a blank line", section)))
}
