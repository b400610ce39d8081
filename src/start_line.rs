//! Start-line classification
//!
//! ```text
//! req-start  = "MSRP" SP transact-id SP method CRLF
//! resp-start = "MSRP" SP transact-id SP status-code [SP phrase] CRLF
//! ```
//!
//! A start line is a response purely because its third token is exactly
//! three ASCII digits. A three-digit method name is therefore read as a
//! response; the wire format cannot tell the two apart.

use crate::error::{MsrpError, MsrpResult};
use crate::limits::{MSRP_TOKEN, SP, STATUS_CODE_LEN};
use crate::line::find_line_end;
use crate::types::{StartKind, StartLine, TextRange};

/// Classify the first line of `buffer` as an MSRP request or response
///
/// Returns [`MsrpError::NotRecognized`] for anything that does not start with
/// `MSRP SP token SP token`.
pub fn classify_start(buffer: &[u8]) -> MsrpResult<StartLine<'_>> {
    let line_len = find_line_end(buffer, 0)
        .map(|end| end.len)
        .unwrap_or(buffer.len());
    let line = &buffer[..line_len];

    // A leading space or no space at all cannot be a start line
    let first_space = match find_space(line, 0) {
        Some(pos) if pos > 0 => pos,
        _ => return Err(MsrpError::NotRecognized),
    };
    if &line[..first_space] != MSRP_TOKEN {
        return Err(MsrpError::NotRecognized);
    }

    let transaction_start = first_space + 1;
    let second_space = find_space(line, transaction_start).ok_or(MsrpError::NotRecognized)?;
    let transaction_range = TextRange::new(transaction_start, second_space);
    if transaction_range.is_empty() {
        return Err(MsrpError::NotRecognized);
    }

    let token_3_start = second_space + 1;
    let token_3_end = find_space(line, token_3_start).unwrap_or(line_len);
    let token_3_range = TextRange::new(token_3_start, token_3_end);
    if token_3_range.is_empty() {
        return Err(MsrpError::NotRecognized);
    }

    let kind = if is_status_code(token_3_range.slice(buffer)) {
        let phrase = if token_3_end < line_len {
            let phrase_range = TextRange::new(token_3_end + 1, line_len);
            (!phrase_range.is_empty()).then(|| phrase_range.text(buffer))
        } else {
            None
        };
        StartKind::Response {
            status_code: token_3_range.text(buffer),
            status_range: token_3_range,
            phrase,
        }
    } else {
        // Any fourth token on a request line is ignored
        StartKind::Request {
            method: token_3_range.text(buffer),
            method_range: token_3_range,
        }
    };

    Ok(StartLine {
        transaction_id: transaction_range.text(buffer),
        transaction_range,
        kind,
        line_range: TextRange::new(0, line_len),
    })
}

/// Quick check used by callers that only need a yes/no answer
pub fn looks_like_msrp(buffer: &[u8]) -> bool {
    classify_start(buffer).is_ok()
}

fn find_space(line: &[u8], from: usize) -> Option<usize> {
    line.get(from..)?
        .iter()
        .position(|&b| b == SP)
        .map(|pos| from + pos)
}

fn is_status_code(token: &[u8]) -> bool {
    token.len() == STATUS_CODE_LEN && token.iter().all(u8::is_ascii_digit)
}
