//! Protocol constants for MSRP framing
//!
//! Values follow the start-line and end-line grammar of RFC 4975.

/// Literal first token of every start line (case-sensitive)
pub const MSRP_TOKEN: &[u8] = b"MSRP";

/// Prefix of every end-line
pub const END_LINE_MARKER: &[u8] = b"-------";

/// Length of [`END_LINE_MARKER`]
pub const END_LINE_MARKER_LEN: usize = 7;

/// Shortest end-line: the marker plus the continuation flag
pub const MIN_END_LINE_LEN: usize = END_LINE_MARKER_LEN + 1;

/// Number of digits in a response status code
pub const STATUS_CODE_LEN: usize = 3;

/// Start-line token separator
pub const SP: u8 = b' ';

/// Horizontal tab, skipped along with SP after a colon or semicolon
pub const HTAB: u8 = b'\t';

/// Separator between a header name and its value
pub const HEADER_COLON: u8 = b':';

/// Separator between a media type and its parameters
pub const PARAM_SEPARATOR: u8 = b';';
