//! End-line location and parsing
//!
//! ```text
//! end-line = "-------" transact-id continuation-flag CRLF
//! ```
//!
//! The scan does not stop at the blank line after the headers: bodies can
//! contain blank lines and arbitrary bytes, so only the seven-hyphen marker
//! ends a message.

use crate::limits::{END_LINE_MARKER, END_LINE_MARKER_LEN, MIN_END_LINE_LEN};
use crate::line::find_line_end;
use crate::types::{ContinuationFlag, EndLine, TextRange};
use tracing::trace;

/// Check whether a line (terminator excluded) has the shape of an end-line
pub fn is_end_line(line: &[u8]) -> bool {
    line.len() >= MIN_END_LINE_LEN && line.starts_with(END_LINE_MARKER)
}

/// Find the offset of the first terminated end-line at or after `search_start`
///
/// `search_start` must be the start of a line. Returns `None` when the
/// buffer ends first, which means the message is incomplete.
pub fn find_end_line(buffer: &[u8], search_start: usize) -> Option<usize> {
    let mut offset = search_start;
    loop {
        let end = find_line_end(buffer, offset)?;
        if is_end_line(&buffer[offset..offset + end.len]) {
            trace!(offset, len = end.len, "end-line located");
            return Some(offset);
        }
        offset = end.next;
    }
}

/// Parse the end-line starting at `offset`
///
/// Returns the end-line and the offset just past its terminator, or `None`
/// if no terminated end-line starts at `offset`.
pub fn parse_end_line(buffer: &[u8], offset: usize) -> Option<(EndLine<'_>, usize)> {
    let end = find_line_end(buffer, offset)?;
    let line_range = TextRange::new(offset, offset + end.len);
    if !is_end_line(line_range.slice(buffer)) {
        return None;
    }

    let flag_offset = line_range.end - 1;
    let transaction_range = TextRange::new(offset + END_LINE_MARKER_LEN, flag_offset);
    let end_line = EndLine {
        transaction_id: transaction_range.text(buffer),
        transaction_range,
        continuation_flag: ContinuationFlag::from_byte(buffer[flag_offset]),
        flag_offset,
        line_range,
    };
    Some((end_line, end.next))
}
