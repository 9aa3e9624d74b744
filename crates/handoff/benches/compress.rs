use criterion::{criterion_group, criterion_main, Criterion};
use handoff_compress::Compressor;
use handoff_storage::{BackendConfig, JsonStorage, MemoryItem, MemoryStorage};
use std::hint::black_box;

fn transcript(lines: usize) -> String {
    (0..lines)
        .map(|i| match i % 5 {
            0 => format!("User: Continue the refactor of component {}", i),
            1 => format!("Updated src/components/widget_{}.tsx", i),
            2 => format!("function renderWidget{}(props) {{", i),
            3 => "Assistant: running the test suite now".to_string(),
            _ => format!("import helper_{} from './helpers'", i),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_compress_1000_lines(c: &mut Criterion) {
    let text = transcript(1_000);
    let compressor = Compressor::new();

    c.bench_function("compress_1000_lines", |b| {
        b.iter(|| compressor.compress(black_box(&text)));
    });
}

fn bench_basic_store_retrieve(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonStorage::open(&BackendConfig::new(dir.path())).unwrap();
    let context = Compressor::new().compress(&transcript(200));
    let item = MemoryItem::new("mem_bench")
        .with("session_memory", serde_json::to_value(&context).unwrap());

    c.bench_function("basic_store_retrieve", |b| {
        b.iter(|| {
            storage.store(black_box(&item)).unwrap();
            storage.retrieve(black_box("mem_bench"))
        });
    });
}

criterion_group!(benches, bench_compress_1000_lines, bench_basic_store_retrieve);
criterion_main!(benches);
