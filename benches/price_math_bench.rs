use criterion::{criterion_group, criterion_main};

mod common;

criterion_group!(price_math_benches, common::bench_price_math);
criterion_main!(price_math_benches);
