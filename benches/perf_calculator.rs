use criterion::{criterion_group, criterion_main, Criterion};

use tiree::input::prices::PriceHistoryBuilder;
use tiree::perf::{calculate_return_and_risk, return_risk_over_time, DEFAULT_ROLLING_WINDOW};

fn build_history() -> tiree::input::prices::PriceHistory {
    let mut builder = PriceHistoryBuilder::new();
    for day in 0..252_i64 {
        //Deterministic zig-zag so runs are comparable
        let drift = 1.0 + day as f64 * 0.001;
        let wobble = if day % 2 == 0 { 1.01 } else { 0.99 };
        builder.add_price(100.0 * drift * wobble, day * 86_400, "ABC");
        builder.add_price(50.0 * drift / wobble, day * 86_400, "BCD");
        builder.add_price(10.0 * drift, day * 86_400, "CDE");
    }
    builder.build()
}

fn benchmarks(c: &mut Criterion) {
    let history = build_history();
    c.bench_function("return and risk summary", |b| {
        b.iter(|| calculate_return_and_risk(&history))
    });
    c.bench_function("return and risk over time", |b| {
        b.iter(|| {
            for (symbol, series) in history.iter() {
                let _ = return_risk_over_time(symbol, series, DEFAULT_ROLLING_WINDOW);
            }
        })
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
