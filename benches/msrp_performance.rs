use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use msrp_parse::*;
use std::sync::Arc;
use std::time::Duration;

/// Session traffic samples for benchmarking
struct MsrpMessageSamples {
    send_text: String,
    response_200: String,
    report: String,
    send_cpim: String,
    large_chunk: String,
}

impl MsrpMessageSamples {
    fn new() -> Self {
        let large_body: String = (0..512)
            .map(|i| format!("line {} of a large file transfer chunk\r\n", i))
            .collect();
        Self {
            send_text: "MSRP a786hjs2 SEND\r\n\
To-Path: msrp://biloxi.example.com:12763/kjhd37s2s20w2a;tcp\r\n\
From-Path: msrp://atlanta.example.com:7654/jshA7weztas;tcp\r\n\
Message-ID: 87652491\r\n\
Byte-Range: 1-25/25\r\n\
Content-Type: text/plain\r\n\
\r\n\
Hey Bob, are you there?\r\n\
-------a786hjs2$\r\n"
                .to_string(),
            response_200: "MSRP a786hjs2 200 OK\r\n\
To-Path: msrp://atlanta.example.com:7654/jshA7weztas;tcp\r\n\
From-Path: msrp://biloxi.example.com:12763/kjhd37s2s20w2a;tcp\r\n\
-------a786hjs2$\r\n"
                .to_string(),
            report: "MSRP dkei38sd REPORT\r\n\
To-Path: msrp://alice.example.com:7777/iau39soe2843z;tcp\r\n\
From-Path: msrp://bob.example.com:8888/9di4eae923wzd;tcp\r\n\
Message-ID: 12339sdqwer\r\n\
Byte-Range: 1-106/106\r\n\
Status: 000 200 OK\r\n\
-------dkei38sd$\r\n"
                .to_string(),
            send_cpim: benchmark::create_cpim_msrp_message(),
            large_chunk: format!(
                "MSRP fl3x8 SEND\r\n\
To-Path: msrp://bob.example.com:8888/9di4eae923wzd;tcp\r\n\
From-Path: msrp://alicepc.example.com:7777/iau39soe2843z;tcp\r\n\
Message-ID: 4410ak\r\n\
Byte-Range: 1-{}/*\r\n\
Content-Type: application/octet-stream\r\n\
\r\n\
{}-------fl3x8+\r\n",
                large_body.len(),
                large_body
            ),
        }
    }

    fn all(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("send_text", self.send_text.as_str()),
            ("response_200", self.response_200.as_str()),
            ("report", self.report.as_str()),
            ("send_cpim", self.send_cpim.as_str()),
            ("large_chunk", self.large_chunk.as_str()),
        ]
    }
}

fn bench_try_parse(c: &mut Criterion) {
    let samples = MsrpMessageSamples::new();
    let parser = MsrpParser::with_registry(BodyHandlerRegistry::with_builtin_handlers());

    let mut group = c.benchmark_group("try_parse");
    group.measurement_time(Duration::from_secs(5));
    for (name, message) in samples.all() {
        group.throughput(Throughput::Bytes(message.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), message.as_bytes(), |b, buffer| {
            b.iter(|| parser.try_parse(black_box(buffer)))
        });
    }
    group.finish();
}

fn bench_raw_fallback(c: &mut Criterion) {
    let samples = MsrpMessageSamples::new();
    let dispatching = MsrpParser::with_registry(BodyHandlerRegistry::with_builtin_handlers());
    let raw_only = MsrpParser::new(
        ParserConfig::default().with_dispatch_bodies(false),
        Arc::new(BodyHandlerRegistry::with_builtin_handlers()),
    );

    let mut group = c.benchmark_group("body_rendering");
    let buffer = samples.send_cpim.as_bytes();
    group.bench_function("cpim_handler", |b| b.iter(|| dispatching.try_parse(black_box(buffer))));
    group.bench_function("raw_lines", |b| b.iter(|| raw_only.try_parse(black_box(buffer))));
    group.finish();
}

fn bench_dissect(c: &mut Criterion) {
    let samples = MsrpMessageSamples::new();

    let mut group = c.benchmark_group("dissect");
    for (label, config) in [
        ("structure_only", ParserConfig::without_raw_text()),
        ("with_raw_text", ParserConfig::default()),
    ] {
        let parser = MsrpParser::new(config, Arc::new(BodyHandlerRegistry::with_builtin_handlers()));
        group.bench_function(label, |b| {
            b.iter(|| {
                let mut sink = RecordingSink::new();
                let _ = parser.dissect(black_box(samples.send_text.as_bytes()), &mut sink);
                sink.records.len()
            })
        });
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let samples = MsrpMessageSamples::new();
    let parser = MsrpParser::with_registry(BodyHandlerRegistry::with_builtin_handlers());
    let buffers: Vec<&[u8]> = samples
        .all()
        .into_iter()
        .map(|(_, message)| message.as_bytes())
        .cycle()
        .take(1000)
        .collect();

    c.bench_function("parse_batch_1000", |b| b.iter(|| parse_batch(&parser, black_box(&buffers))));
}

criterion_group!(benches, bench_try_parse, bench_raw_fallback, bench_dissect, bench_batch);
criterion_main!(benches);
