//! Non-fatal cross checks on a parsed message
//!
//! These never reject a message; findings are appended to
//! [`ParsedMessage::diagnostics`].

use crate::types::{Diagnostic, ParsedMessage};
use tracing::debug;

/// Compare the start-line and end-line transaction identifiers
pub fn check_transaction_ids(message: &mut ParsedMessage<'_>) {
    if let Some(diagnostic) = transaction_id_mismatch(message) {
        message.diagnostics.push(diagnostic);
    }
}

/// Mismatch between the two transaction identifiers, if any
pub fn transaction_id_mismatch(message: &ParsedMessage<'_>) -> Option<Diagnostic> {
    let start = &message.start_line.transaction_id;
    let end = &message.end_line.transaction_id;
    if start == end {
        return None;
    }
    debug!(start = %start, end = %end, "transaction id mismatch between start and end line");
    Some(Diagnostic::TransactionIdMismatch {
        start: start.to_string(),
        end: end.to_string(),
    })
}
