//! Thread-per-core throughput benchmark for the MSRP parser

use crate::body::BodyHandlerRegistry;
use crate::parser::MsrpParser;
use crate::types::{BodyRendering, HeaderKind};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Which part of the work each benchmark iteration performs
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BenchmarkType {
    /// Framing and header parsing of a message without a body
    FramingOnly,
    /// Parse and read a few headers back
    HeaderAccess,
    /// Parse a CPIM message and let the body handler render it
    CpimBody,
}

/// Totals of one benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkReport {
    pub iterations: usize,
    pub successful_parses: usize,
    pub threads: usize,
    pub message_size: usize,
    pub elapsed: Duration,
}

impl BenchmarkReport {
    pub fn parses_per_second(&self) -> f64 {
        self.iterations as f64 / self.elapsed.as_secs_f64()
    }

    pub fn throughput_mbps(&self) -> f64 {
        let total_bytes = self.iterations as f64 * self.message_size as f64;
        (total_bytes / 1_000_000.0) / self.elapsed.as_secs_f64()
    }

    /// Mean wall time of one parse, `None` for an empty run
    pub fn average_parse_time(&self) -> Option<Duration> {
        if self.iterations == 0 {
            return None;
        }
        Some(self.elapsed.div_f64(self.iterations as f64))
    }
}

/// Iterations across all threads, clamped at `usize::MAX`
pub fn total_iterations(iterations_per_thread: usize, threads: usize) -> usize {
    iterations_per_thread.saturating_mul(threads)
}

/// Run every benchmark type with one thread per CPU core
pub fn run_comprehensive_benchmark(iterations_per_thread: usize) -> Vec<BenchmarkReport> {
    println!(">>>> Running Manual Thread-Based MSRP Parsing Benchmark <<<<");

    let num_cores = num_cpus::get();
    println!("Running on {} CPU cores", num_cores);

    [
        BenchmarkType::FramingOnly,
        BenchmarkType::HeaderAccess,
        BenchmarkType::CpimBody,
    ]
    .into_iter()
    .map(|benchmark_type| benchmark_manual_threads(benchmark_type, iterations_per_thread))
    .collect()
}

/// Benchmark using manual thread creation - one thread per core
pub fn benchmark_manual_threads(benchmark_type: BenchmarkType, iterations_per_thread: usize) -> BenchmarkReport {
    let (title, message) = match benchmark_type {
        BenchmarkType::FramingOnly => ("Framing Only (no body)", create_simple_msrp_message()),
        BenchmarkType::HeaderAccess => ("Header Access", create_simple_msrp_message()),
        BenchmarkType::CpimBody => ("CPIM Body Rendering", create_cpim_msrp_message()),
    };

    println!("\n--- Benchmark: {} ---", title);

    let num_cores = num_cpus::get();
    let total_iterations = total_iterations(iterations_per_thread, num_cores);
    println!(
        "Running {} iterations ({} per thread on {} threads)",
        total_iterations, iterations_per_thread, num_cores
    );

    // One frozen parser shared by every thread
    let parser = Arc::new(MsrpParser::with_registry(BodyHandlerRegistry::with_builtin_handlers()));
    let message = Arc::new(message);
    let successful_parses = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();

    let mut handles = vec![];
    for _ in 0..num_cores {
        let parser = Arc::clone(&parser);
        let message = Arc::clone(&message);
        let counter = Arc::clone(&successful_parses);

        let handle = thread::spawn(move || {
            for _ in 0..iterations_per_thread {
                let parsed = match parser.try_parse(message.as_bytes()) {
                    Ok(parsed) => parsed,
                    Err(_) => continue,
                };
                let ok = match benchmark_type {
                    BenchmarkType::FramingOnly => true,
                    BenchmarkType::HeaderAccess => {
                        parsed.header_value(HeaderKind::ToPath).is_some()
                            && parsed.header_value(HeaderKind::FromPath).is_some()
                            && parsed.header_value(HeaderKind::MessageId).is_some()
                    }
                    BenchmarkType::CpimBody => matches!(
                        parsed.body.as_ref().map(|body| &body.rendering),
                        Some(BodyRendering::Handled { .. })
                    ),
                };
                if ok {
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            }
        });

        handles.push(handle);
    }

    for handle in handles {
        if handle.join().is_err() {
            warn!("benchmark thread panicked");
        }
    }

    let report = BenchmarkReport {
        iterations: total_iterations,
        successful_parses: successful_parses.load(Ordering::Relaxed),
        threads: num_cores,
        message_size: message.len(),
        elapsed: start.elapsed(),
    };
    info!(benchmark = title, successful = report.successful_parses, "benchmark finished");
    print_benchmark_results(&report);
    report
}

/// Helper function to print benchmark results
fn print_benchmark_results(report: &BenchmarkReport) {
    println!("Time elapsed: {:?}", report.elapsed);
    if let Some(average) = report.average_parse_time() {
        println!("Average time per parse: {:?}", average);
    }
    println!("Parses per second: {:.2}", report.parses_per_second());
    println!("Message size: {} bytes", report.message_size);
    println!("Throughput: {:.2} MB/s", report.throughput_mbps());
    println!("Successful parses: {}", report.successful_parses);
}

/// A SEND request without a body
pub fn create_simple_msrp_message() -> String {
    "MSRP a786hjs2 SEND\r\n\
To-Path: msrp://biloxi.example.com:12763/kjhd37s2s20w2a;tcp\r\n\
From-Path: msrp://atlanta.example.com:7654/jshA7weztas;tcp\r\n\
Message-ID: 87652491\r\n\
Byte-Range: 1-0/0\r\n\
\r\n\
-------a786hjs2$\r\n"
        .to_string()
}

/// A SEND request carrying a CPIM wrapped text message
pub fn create_cpim_msrp_message() -> String {
    "MSRP d93kswow SEND\r\n\
To-Path: msrp://bob.example.com:8888/9di4eae923wzd;tcp\r\n\
From-Path: msrp://alicepc.example.com:7777/iau39soe2843z;tcp\r\n\
Message-ID: 12339sdqwer\r\n\
Byte-Range: 1-171/171\r\n\
Content-Type: message/cpim\r\n\
\r\n\
From: Alice <im:alice@example.com>\r\n\
To: Bob <im:bob@example.com>\r\n\
DateTime: 2006-05-15T15:02:31-03:00\r\n\
\r\n\
Content-Type: text/plain\r\n\
\r\n\
Hi, Bob!\r\n\
-------d93kswow$\r\n"
        .to_string()
}
