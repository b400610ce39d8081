//! Command line front end for the MSRP parser
//!
//! ```text
//! msrp-parse                 dissect the built-in sample messages
//! msrp-parse FILE...         dissect every message found in each file
//! msrp-parse bench [N]       run the thread-per-core benchmark, N iterations per thread
//! ```
//!
//! Set `RUST_LOG=msrp_parse=debug` to see parser events.

use msrp_parse::benchmark::{create_cpim_msrp_message, create_simple_msrp_message, run_comprehensive_benchmark};
use msrp_parse::{
    install_global_registry, BodyHandlerRegistry, FieldRecord, FieldSink, MsrpError, MsrpParser, ParsedMessage,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_ITERATIONS: usize = 1_000_000;

/// Prints records as an indented tree
struct TreePrinter;

impl FieldSink for TreePrinter {
    fn record(&mut self, record: FieldRecord<'_>) {
        let indent = "    ".repeat(record.depth);
        if record.value.is_empty() {
            println!("{}{} [{}]", indent, record.field.name(), record.range);
        } else {
            println!("{}{}: {} [{}]", indent, record.field.name(), record.value, record.range);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    install_global_registry(BodyHandlerRegistry::with_builtin_handlers())?;
    let parser = MsrpParser::default();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("bench") => {
            let iterations = match args.get(1) {
                Some(value) => value.parse()?,
                None => DEFAULT_ITERATIONS,
            };
            run_comprehensive_benchmark(iterations);
        }
        Some(_) => {
            for path in &args {
                println!("==> {} <==", path);
                let data = std::fs::read(path)?;
                dissect_stream(&parser, &data);
            }
        }
        None => {
            println!("Dissecting sample messages...\n");
            for sample in [create_simple_msrp_message(), create_cpim_msrp_message()] {
                dissect_stream(&parser, sample.as_bytes());
                println!();
            }

            println!("Parsing a truncated message...");
            let truncated = "MSRP a786hjs2 SEND\r\nTo-Path: x\r\n\r\nbody";
            match parser.try_parse(truncated.as_bytes()) {
                Ok(_) => println!("Unexpectedly parsed a truncated message!"),
                Err(e) => println!("Expected error: {}", e),
            }
        }
    }
    Ok(())
}

/// Dissect back-to-back messages until the data runs out or stops parsing
fn dissect_stream(parser: &MsrpParser, data: &[u8]) {
    let mut offset = 0;
    while offset < data.len() {
        match parser.dissect(&data[offset..], &mut TreePrinter) {
            Ok(message) => {
                report_diagnostics(&message);
                offset += message.total_len;
            }
            Err(MsrpError::Incomplete { transaction_id, .. }) => {
                println!("Incomplete message for transaction {} at offset {}", transaction_id, offset);
                break;
            }
            Err(e) => {
                println!("Stopped at offset {}: {}", offset, e);
                break;
            }
        }
    }
}

fn report_diagnostics(message: &ParsedMessage<'_>) {
    for diagnostic in &message.diagnostics {
        println!("  note: {:?}", diagnostic);
    }
}
