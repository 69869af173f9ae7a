//! Trace, line and depth-slice read benchmarks
//!
//! Volumes live in a [`MemoryStore`] so the numbers measure decoding and
//! addressing rather than the disk.
//!
//! ```bash
//! cargo bench --bench trace_read
//! cargo bench --bench trace_read -- depth_slice
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use segy::{MemoryStore, SampleFormat, SegyFile, Sorting, VolumeSpec};
use std::hint::black_box;

const ILINES: i32 = 50;
const XLINES: i32 = 50;
const SAMPLES: usize = 500;

fn create_volume(format: SampleFormat) -> SegyFile {
    let spec = VolumeSpec::new(
        format,
        Sorting::InlineMajor,
        SAMPLES,
        (1..=ILINES).collect(),
        (100..100 + XLINES).collect(),
    );
    let file = SegyFile::create_in(Box::new(MemoryStore::new()), &spec).unwrap();
    let trace: Vec<f32> = (0..SAMPLES).map(|i| (i as f32 * 0.1).sin()).collect();
    for index in 0..file.tracecount() {
        file.traces().write(index, &trace).unwrap();
    }
    file
}

fn bench_trace_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_read");
    group.throughput(Throughput::Elements(SAMPLES as u64));

    for format in [
        SampleFormat::IbmFloat32,
        SampleFormat::IeeeFloat32,
        SampleFormat::Int16,
    ] {
        let file = create_volume(format);
        group.bench_with_input(BenchmarkId::new("read", format), &file, |b, file| {
            b.iter(|| black_box(file.traces().read(black_box(1234)).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("read_into", format), &file, |b, file| {
            let mut buf = vec![0f32; SAMPLES];
            b.iter(|| {
                file.traces().read_into(black_box(1234), &mut buf).unwrap();
                black_box(&buf);
            });
        });
    }
    group.finish();
}

fn bench_line_read(c: &mut Criterion) {
    let file = create_volume(SampleFormat::IbmFloat32);
    let mut group = c.benchmark_group("line_read");

    group.bench_function("inline", |b| {
        b.iter(|| black_box(file.iline().get(black_box(25)).unwrap()))
    });
    group.bench_function("crossline", |b| {
        b.iter(|| black_box(file.xline().get(black_box(125)).unwrap()))
    });
    group.bench_function("depth_slice", |b| {
        b.iter(|| black_box(file.depth_slice().get(black_box(250)).unwrap()))
    });
    group.finish();
}

fn bench_trace_scan(c: &mut Criterion) {
    let file = create_volume(SampleFormat::IbmFloat32);
    let mut group = c.benchmark_group("trace_scan");
    group.throughput(Throughput::Elements(file.tracecount() as u64));

    group.bench_function("iter", |b| {
        b.iter(|| {
            for trace in file.traces().iter(..).unwrap() {
                black_box(trace.unwrap());
            }
        })
    });
    group.bench_function("cursor", |b| {
        let mut buf = vec![0f32; SAMPLES];
        b.iter(|| {
            let mut cursor = file.traces().cursor(.., &mut buf).unwrap();
            while let Some(trace) = cursor.next() {
                black_box(trace.unwrap());
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_trace_read, bench_line_read, bench_trace_scan);
criterion_main!(benches);
