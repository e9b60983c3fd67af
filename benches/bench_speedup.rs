use std::num::NonZeroU32;

use criterion::{criterion_group, criterion_main, Criterion};

use speedup::{BenchmarkConfig, Invocation, Result, Setting};

fn run(c: &mut Criterion) {
    let config = BenchmarkConfig::new(
        SETTINGS.iter().map(|&s| Setting::from(s)).collect(),
        THREADS.iter().filter_map(|&n| NonZeroU32::new(n)).collect(),
        5,
    )
    .unwrap();

    c.bench_function("run", |b| {
        b.iter(|| {
            let mut runner = |invocation: &Invocation| -> Result<f64> {
                let size = SETTINGS.iter().position(|&s| s == invocation.setting.as_str());
                let base = 0.25 * (size.unwrap_or(0) + 1) as f64;
                Ok(base / invocation.threads.map_or(1.0, |n| f64::from(n.get())))
            };
            speedup::run(&config, &mut runner)
        })
    });
}

const SETTINGS: [&str; 5] = ["xsmall", "small", "medium", "large", "xlarge"];

const THREADS: [u32; 8] = [1, 2, 4, 6, 8, 12, 16, 32];

criterion_group!(benches, run);
criterion_main!(benches);
