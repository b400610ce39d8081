//! Parallel parsing of independent buffers
//!
//! Each buffer holds its own candidate message. Parses share one parser and
//! its frozen registry and never coordinate with each other.

use crate::error::MsrpResult;
use crate::parser::MsrpParser;
use crate::types::ParsedMessage;
use rayon::prelude::*;
use tracing::debug;

/// Parse every buffer in parallel; results keep the input order
pub fn parse_batch<'a>(parser: &MsrpParser, buffers: &[&'a [u8]]) -> Vec<MsrpResult<ParsedMessage<'a>>> {
    debug!(buffers = buffers.len(), threads = rayon::current_num_threads(), "parsing batch");
    buffers
        .par_iter()
        .map(|&buffer| parser.try_parse(buffer))
        .collect()
}

/// Count the buffers in a batch that parse successfully
pub fn count_parsed(parser: &MsrpParser, buffers: &[&[u8]]) -> usize {
    buffers
        .par_iter()
        .filter(|buffer| parser.try_parse(buffer).is_ok())
        .count()
}
