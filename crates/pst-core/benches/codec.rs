use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pst_core::{decode, decode_argv, encode, ArgvOptions, EncodeOptions, FlagStyle, Value};

/// A build-configuration-like document with `n` targets.
fn document(n: usize) -> Value {
    let targets = (0..n)
        .map(|i| {
            [
                ("name", Value::from(format!("target-{i}"))),
                ("jobs", Value::Int(i as i64 % 16)),
                ("release", Value::Bool(i % 2 == 0)),
                ("ratio", Value::Float(i as f64 / 7.0)),
                ("note", Value::from("needs \"quotes\" and spaces")),
            ]
            .into_iter()
            .collect::<Value>()
        })
        .collect();
    [("project", Value::from("pst")), ("targets", Value::Array(targets))]
        .into_iter()
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for n in [10, 100, 1000] {
        let value = document(n);
        group.bench_with_input(BenchmarkId::new("compact", n), &value, |b, v| {
            b.iter(|| encode(black_box(v), &EncodeOptions::new()))
        });
        let pretty = EncodeOptions::pretty().with_flags(FlagStyle::Both).with_escape(true);
        group.bench_with_input(BenchmarkId::new("pretty_flags_escape", n), &value, |b, v| {
            b.iter(|| encode(black_box(v), &pretty))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for n in [10, 100, 1000] {
        let text = encode(&document(n), &EncodeOptions::new());
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &text, |b, t| {
            b.iter(|| decode(black_box(t)))
        });
    }
    group.finish();
}

fn bench_argv(c: &mut Criterion) {
    let args: Vec<String> = (0..200)
        .flat_map(|i| [format!("-v{}", i % 10), format!("key{i}:"), i.to_string()])
        .chain(["--".to_string(), "tail".to_string()])
        .collect();
    c.bench_function("decode_argv/600", |b| {
        b.iter(|| decode_argv(black_box(&args), &ArgvOptions::default()))
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_argv);
criterion_main!(benches);
