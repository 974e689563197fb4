use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::{fs::File, io::Write};

use fastmarc::{Reader, ReaderOptions};

// Writes `record_count` records of 40 to 2000 bytes, followed by a newline
fn create_test_file(record_count: usize) -> File {
    let mut file = tempfile::tempfile().unwrap();
    let mut buffer = Vec::new();
    for i in 0..record_count {
        let len = 40 + (i * 37) % 1960;
        let start = buffer.len();
        buffer.extend_from_slice(format!("{:05}", len).as_bytes());
        buffer.resize(start + len, b'a' + (i % 26) as u8);
    }
    buffer.push(b'\n');
    file.write_all(&buffer).unwrap();
    file
}

fn bench_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("index");
    let file = create_test_file(100_000);

    group.bench_function("open_mapped", |b| {
        b.iter(|| {
            let reader = Reader::open(&file).unwrap();
            black_box(reader.len())
        });
    });

    group.bench_function("open_streaming", |b| {
        b.iter(|| {
            let reader =
                Reader::<_>::open_with_options(&file, ReaderOptions::streaming()).unwrap();
            black_box(reader.len())
        });
    });

    let mapped = Reader::open(&file).unwrap();
    group.bench_function("iter_mapped", |b| {
        b.iter(|| {
            let mut total = 0;
            for record in mapped.iter().unwrap() {
                total += record.unwrap().len();
            }
            black_box(total)
        });
    });

    let streaming = Reader::<_>::open_with_options(&file, ReaderOptions::streaming()).unwrap();
    group.bench_function("iter_streaming", |b| {
        b.iter(|| {
            let mut total = 0;
            for record in streaming.iter().unwrap() {
                total += record.unwrap().len();
            }
            black_box(total)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_index);
criterion_main!(benches);
