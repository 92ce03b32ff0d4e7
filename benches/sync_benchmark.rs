/*!
 * Synchronization Primitives Benchmarks
 *
 * Uncontended fast paths, publish fan-out, and contended handoff through
 * the async mutex and semaphore.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use waitkit::{Counter, Mutex, Semaphore, SubscribeOptions, Subscribable};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_time()
        .build()
        .expect("benchmark runtime")
}

fn bench_uncontended(c: &mut Criterion) {
    let semaphore = Semaphore::new(8);
    c.bench_function("semaphore_try_acquire_release", |b| {
        b.iter(|| {
            let permit = semaphore.try_acquire(1).ok().flatten();
            black_box(&permit);
        });
    });

    let mutex = Mutex::new();
    c.bench_function("mutex_try_lock", |b| {
        b.iter(|| black_box(mutex.try_lock()));
    });

    let counter = Counter::new(0);
    c.bench_function("counter_increment", |b| {
        b.iter(|| black_box(counter.increment()));
    });
}

fn bench_publish_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("subscribable_publish");

    for subscribers in [1usize, 8, 64] {
        let hub = Subscribable::<u64>::new();
        for _ in 0..subscribers {
            hub.subscribe(
                Arc::new(|v: &u64| {
                    black_box(*v);
                }),
                SubscribeOptions::default(),
            );
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &hub,
            |b, hub| {
                b.iter(|| black_box(hub.publish(&42)));
            },
        );
    }

    group.finish();
}

fn bench_contended_mutex(c: &mut Criterion) {
    let rt = runtime();

    c.bench_function("mutex_contended_8_tasks", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mutex = Arc::new(Mutex::new());
                let mut tasks = Vec::with_capacity(8);
                for _ in 0..8 {
                    let mutex = mutex.clone();
                    tasks.push(tokio::spawn(async move {
                        for _ in 0..32 {
                            let guard = mutex.lock(None).await;
                            black_box(&guard);
                        }
                    }));
                }
                for task in tasks {
                    task.await.ok();
                }
            });
        });
    });
}

criterion_group!(
    benches,
    bench_uncontended,
    bench_publish_fanout,
    bench_contended_mutex
);

criterion_main!(benches);
