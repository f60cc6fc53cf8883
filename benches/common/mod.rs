#![allow(dead_code)]

use clmm_price_engine::{
    math::{
        math_helpers::{isqrt, mul_div},
        price_math::{price_to_tick, sqrt_price_x96_to_price, tick_to_price},
        slippage_math::{minimum_output, sqrt_price_limit},
        tick_math::{get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio, nearest_usable_tick},
    },
    ExchangeRate, Q96, U1024, U256,
};
use criterion::{black_box, Criterion};

const TICKS: [i32; 5] = [-887_272, -200_311, 0, 200_311, 887_272];

pub fn bench_tick_math(c: &mut Criterion) {
    c.bench_function("get_sqrt_ratio_at_tick", |b| {
        b.iter(|| {
            for tick in TICKS {
                black_box(get_sqrt_ratio_at_tick(black_box(tick)).unwrap());
            }
        })
    });

    let ratios: Vec<U256> = TICKS[..4]
        .iter()
        .map(|&tick| get_sqrt_ratio_at_tick(tick).unwrap())
        .collect();
    c.bench_function("get_tick_at_sqrt_ratio", |b| {
        b.iter(|| {
            for &ratio in &ratios {
                black_box(get_tick_at_sqrt_ratio(black_box(ratio)).unwrap());
            }
        })
    });

    c.bench_function("nearest_usable_tick", |b| {
        b.iter(|| {
            for tick in TICKS {
                black_box(nearest_usable_tick(black_box(tick), black_box(60)).unwrap());
            }
        })
    });
}

pub fn bench_math_helpers(c: &mut Criterion) {
    c.bench_function("mul_div", |b| {
        b.iter(|| {
            black_box(
                mul_div(
                    black_box(U256::MAX - U256::from(7u8)),
                    black_box(U256::from(9_900u16)),
                    black_box(U256::from(10_000u16)),
                )
                .unwrap(),
            )
        })
    });

    let wide = U1024::from(Q96) * U1024::from(Q96) * U1024::from(12_345u32);
    c.bench_function("isqrt_u1024", |b| b.iter(|| black_box(isqrt(black_box(wide)))));
}

pub fn bench_slippage_math(c: &mut Criterion) {
    c.bench_function("minimum_output", |b| {
        b.iter(|| {
            black_box(minimum_output(black_box(Some(U256::from(1_999_500_000u64))), black_box(100)).unwrap())
        })
    });

    c.bench_function("sqrt_price_limit", |b| {
        b.iter(|| black_box(sqrt_price_limit(black_box(Q96), black_box(true), black_box(50)).unwrap()))
    });
}

pub fn bench_price_math(c: &mut Criterion) {
    let sqrt_price_x96 = get_sqrt_ratio_at_tick(200_311).unwrap();
    c.bench_function("sqrt_price_x96_to_price", |b| {
        b.iter(|| black_box(sqrt_price_x96_to_price(black_box(sqrt_price_x96), 6, 18, true).unwrap()))
    });

    c.bench_function("tick_to_price", |b| {
        b.iter(|| black_box(tick_to_price(black_box(200_311), 6, 18, true).unwrap()))
    });

    let price: ExchangeRate = "2000".parse().unwrap();
    c.bench_function("price_to_tick", |b| {
        b.iter(|| black_box(price_to_tick(black_box(&price), 6, 18, true).unwrap()))
    });

    let rate = tick_to_price(200_311, 6, 18, true).unwrap();
    c.bench_function("format_rate", |b| b.iter(|| black_box(black_box(&rate).to_string())));
}
