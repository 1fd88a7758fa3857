//! # SDK Store Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | Codec | encode / decode of worker-status sized values |
//! | Client | set + get through `ScopedStoreClient` over `InMemoryStore` |
//! | Fan-out | one `set` notifying N subscribers |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use shared_store::{
    decode, encode, Decoded, InMemoryStore, ScopedStoreApi, ScopedStoreClient, StoreContext,
    StoreScope, ValueCallback,
};
use std::sync::Arc;
use std::time::Duration;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("failed to build runtime")
}

fn status_value() -> serde_json::Value {
    json!({
        "timestamp": "2026-10-15T09:30:00.000Z",
        "message": "Tick #3: Cleaning up cache",
        "data": {"task": "Cleaning up cache", "randomValue": 41, "memoryUsage": "41%", "queueLength": 7},
        "tickCount": 3,
        "isRunning": true
    })
}

// ============================================================================
// Codec
// ============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let value = status_value();
    let text = encode(&value);

    group.bench_function("encode_status", |b| b.iter(|| black_box(encode(&value))));
    group.bench_function("decode_status", |b| b.iter(|| black_box(decode(&text))));
    group.bench_function("decode_raw_fallback", |b| {
        b.iter(|| black_box(decode("plain text, not json")))
    });

    group.finish();
}

// ============================================================================
// Client over the in-memory store
// ============================================================================

fn bench_client_set_get(c: &mut Criterion) {
    let rt = runtime();
    let client = ScopedStoreClient::new(
        Arc::new(InMemoryStore::new()),
        StoreContext::new("bench"),
    );
    let value = status_value();

    let mut group = c.benchmark_group("client");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("set_then_get_instance", |b| {
        b.iter(|| {
            rt.block_on(async {
                client
                    .set(&StoreScope::Instance, "worker_state", &value)
                    .await
                    .expect("set failed");
                black_box(
                    client
                        .get(&StoreScope::Instance, "worker_state")
                        .await
                        .expect("get failed"),
                )
            })
        })
    });

    group.finish();
}

// ============================================================================
// Subscriber fan-out
// ============================================================================

fn bench_fan_out(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("fan_out");
    let value = status_value();

    for subscribers in [1usize, 10, 100] {
        let client = ScopedStoreClient::new(
            Arc::new(InMemoryStore::new()),
            StoreContext::new("bench"),
        );
        rt.block_on(async {
            for _ in 0..subscribers {
                let callback: ValueCallback = Arc::new(|value: Decoded| {
                    black_box(value);
                });
                client
                    .subscribe(&StoreScope::Instance, "worker_state", callback)
                    .await
                    .expect("subscribe failed");
            }
        });

        group.throughput(Throughput::Elements(subscribers as u64));
        group.bench_with_input(
            BenchmarkId::new("set_notify", subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| {
                    rt.block_on(client.set(&StoreScope::Instance, "worker_state", &value))
                        .expect("set failed")
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_client_set_get, bench_fan_out);
criterion_main!(benches);
