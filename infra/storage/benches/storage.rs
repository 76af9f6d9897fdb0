use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dhub_storage::{Compression, Storage};
use std::hint::black_box;
use tempfile::TempDir;

fn bench_path_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_resolution");

    let temp = TempDir::new().unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let storage = rt.block_on(async {
        Storage::builder().root(temp.path()).create(true).connect().await.unwrap()
    });

    group.bench_function("root_file", |b| {
        b.iter(|| {
            black_box(storage.resolve("Lamp_1.0.0.fbmodel").unwrap());
        });
    });

    group.bench_function("namespaced_file", |b| {
        let ns = storage.namespace("com.acme.lighting").unwrap();
        b.iter(|| {
            black_box(ns.resolve("Lamp_1.0.0.fbmodel").unwrap());
        });
    });

    group.finish();
}

fn bench_write_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_read");

    let rt = tokio::runtime::Runtime::new().unwrap();
    let sizes = [("1KB", 1024), ("64KB", 64 * 1024)];

    for compression in [Compression::None, Compression::Lz4] {
        for (name, size) in sizes {
            let temp = TempDir::new().unwrap();
            let storage = rt.block_on(async {
                Storage::builder()
                    .root(temp.path())
                    .compression(compression)
                    .connect()
                    .await
                    .unwrap()
            });
            let data = vec![b'm'; size];

            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{compression:?}"), name),
                &data,
                |b, data| {
                    b.iter(|| {
                        rt.block_on(async {
                            storage.write("bench.entity", data).await.unwrap();
                            black_box(storage.read("bench.entity").await.unwrap());
                        });
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_path_resolution, bench_write_read);
criterion_main!(benches);
