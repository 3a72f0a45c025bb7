use criterion::{criterion_group, criterion_main, Criterion};
use std::path::Path;

use ngarchive::archive::{self, IngestOptions};
use ngarchive::flags::FlagTables;
use ngarchive::parser::chunk::split_chunks;
use ngarchive::parser::repair::RepairTable;

fn sample_bytes() -> Vec<u8> {
    let fixture_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample.mbox");
    let bytes = std::fs::read(fixture_path).unwrap();
    // Repeat the fixture so the run is long enough to measure.
    bytes.repeat(200)
}

fn bench_chunking(c: &mut Criterion) {
    let bytes = sample_bytes();
    let repairs = RepairTable::builtin();
    c.bench_function("split_chunks", |b| {
        b.iter(|| split_chunks(&bytes, &repairs).chunks.len())
    });
}

fn bench_ingest(c: &mut Criterion) {
    let bytes = sample_bytes();
    let flags = FlagTables::builtin();
    let repairs = RepairTable::builtin();
    c.bench_function("build_archive", |b| {
        b.iter(|| {
            archive::build(&bytes, &flags, &repairs, IngestOptions::default(), None)
                .unwrap()
                .0
                .len()
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let bytes = sample_bytes();
    let (archive, _) = archive::build(
        &bytes,
        &FlagTables::builtin(),
        &RepairTable::builtin(),
        IngestOptions::default(),
        None,
    )
    .unwrap();
    c.bench_function("search_two_terms", |b| {
        b.iter(|| archive.search("army north").len())
    });
}

criterion_group!(benches, bench_chunking, bench_ingest, bench_search);
criterion_main!(benches);
