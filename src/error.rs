//! Error handling for the MSRP parser
//!
//! Only two conditions end a parse: the buffer is not MSRP at all, or it is
//! MSRP but the end-line has not arrived yet. Everything else is recovered
//! locally and reported as a [`Diagnostic`](crate::types::Diagnostic).

use std::error::Error as StdError;
use std::fmt;

/// Unified error type for MSRP parsing operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MsrpError {
    /// The first line does not match the start-line grammar; try another protocol
    NotRecognized,

    /// A valid start line was found but no terminated end-line follows it
    Incomplete {
        transaction_id: String,
        /// Bytes examined before giving up
        scanned: usize,
    },

    /// A process-wide body handler registry was installed twice
    RegistryAlreadyInstalled,
}

impl fmt::Display for MsrpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MsrpError::NotRecognized => write!(f, "Not an MSRP message"),
            MsrpError::Incomplete {
                transaction_id,
                scanned,
            } => write!(
                f,
                "Incomplete MSRP message: no end-line for transaction {} in {} bytes",
                transaction_id, scanned
            ),
            MsrpError::RegistryAlreadyInstalled => {
                write!(f, "Body handler registry already installed")
            }
        }
    }
}

impl StdError for MsrpError {}

impl MsrpError {
    /// Create an incomplete-message error
    pub fn incomplete(transaction_id: impl Into<String>, scanned: usize) -> Self {
        MsrpError::Incomplete {
            transaction_id: transaction_id.into(),
            scanned,
        }
    }

    /// Bytes consumed when a parse ends with this error, always zero
    pub fn consumed(&self) -> usize {
        0
    }

    /// Check if more data could turn this into a successful parse
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MsrpError::Incomplete { .. })
    }

    /// Get error category for metrics
    pub fn category(&self) -> &'static str {
        match self {
            MsrpError::NotRecognized => "not_recognized",
            MsrpError::Incomplete { .. } => "incomplete",
            MsrpError::RegistryAlreadyInstalled => "registry",
        }
    }
}

/// Result type for MSRP operations
pub type MsrpResult<T> = Result<T, MsrpError>;

/// Why a body handler did not render a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler does not accept this body (e.g. an unsupported charset)
    Declined(String),
    /// The handler tried and failed
    Failed(String),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Declined(reason) => write!(f, "declined: {}", reason),
            HandlerError::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

impl StdError for HandlerError {}

impl HandlerError {
    pub fn declined(reason: impl Into<String>) -> Self {
        HandlerError::Declined(reason.into())
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        HandlerError::Failed(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let incomplete = MsrpError::incomplete("a786hjs2", 42);
        assert!(incomplete.to_string().contains("a786hjs2"));
        assert!(incomplete.to_string().contains("42 bytes"));
        assert!(incomplete.is_recoverable());
        assert_eq!(incomplete.consumed(), 0);

        assert!(!MsrpError::NotRecognized.is_recoverable());
        assert_eq!(MsrpError::NotRecognized.consumed(), 0);
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(MsrpError::NotRecognized.category(), "not_recognized");
        assert_eq!(MsrpError::incomplete("x", 0).category(), "incomplete");
        assert_eq!(MsrpError::RegistryAlreadyInstalled.category(), "registry");
    }

    #[test]
    fn test_handler_error_display() {
        assert_eq!(
            HandlerError::declined("charset iso-2022-jp").to_string(),
            "declined: charset iso-2022-jp"
        );
        assert_eq!(HandlerError::failed("no colon").to_string(), "failed: no colon");
    }
}
