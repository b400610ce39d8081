//! MSRP message parser
//!
//! Recognises, frames and decomposes Message Session Relay Protocol (RFC 4975)
//! messages held in a byte buffer: start line, header block, optional body
//! and the `-------<transaction-id><flag>` end-line. Parsed values borrow from
//! the buffer.
//!
//! Bodies are handed to a [`BodyHandler`] registered for their media type,
//! falling back to a raw line-by-line rendering. Registries are populated at
//! startup and frozen before parsing begins.
//!
//! ```
//! use msrp_parse::{MsrpParser, BodyHandlerRegistry};
//!
//! let parser = MsrpParser::with_registry(BodyHandlerRegistry::with_builtin_handlers());
//! let buffer = b"MSRP a786hjs2 200 OK\r\n\r\n-------a786hjs2$\r\n";
//!
//! let message = parser.try_parse(buffer).unwrap();
//! assert_eq!(message.start_line.status(), Some(200));
//! assert_eq!(message.summary(), "Response: 200 OK Transaction ID: a786hjs2");
//! ```

pub mod batch;
pub mod benchmark;
pub mod body;
pub mod config;
pub mod content_type;
pub mod end_line;
pub mod error;
pub mod handlers;
pub mod headers;
pub mod limits;
pub mod line;
pub mod parser;
pub mod sink;
pub mod start_line;
pub mod types;
pub mod validation;

pub use batch::parse_batch;
pub use body::{global_registry, install_global_registry, BodyHandler, BodyHandlerRegistry};
pub use config::ParserConfig;
pub use error::{HandlerError, MsrpError, MsrpResult};
pub use handlers::{CpimHandler, TextPlainHandler};
pub use parser::{try_parse, MsrpParser};
pub use sink::{FieldId, FieldRecord, FieldSink, RecordingSink};
pub use types::{
    Body, BodyItem, BodyRendering, ContentType, ContinuationFlag, Diagnostic, EndLine, HeaderField, HeaderKind,
    HeaderName, ParsedMessage, StartKind, StartLine, TextRange,
};
