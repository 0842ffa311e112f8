//! Benchmarks for draw-instruction building and text bars.
//!
//! Run with: cargo bench -p wfall-render --bench draw_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use wfall_core::{Domain, WaterfallItem, reduce};
use wfall_render::{RenderConfig, render_bars, to_draw_instructions, to_draw_instructions_in};

fn items(n: usize) -> Vec<WaterfallItem> {
    let mut items = Vec::with_capacity(n + 2);
    items.push(WaterfallItem::start("Revenue", 847_000.0));
    for i in 0..n {
        let amount = 2_500.0 + (i as f64 * 911.0) % 40_000.0;
        items.push(match i % 4 {
            3 => WaterfallItem::subtotal(format!("Sub {i}")),
            _ => WaterfallItem::outflow(format!("Cost {i}"), amount)
                .with_revenue_share(amount / 8_470.0, Some(amount / 9_000.0)),
        });
    }
    items.push(WaterfallItem::end("Net"));
    items
}

fn bench_instructions(c: &mut Criterion) {
    let config = RenderConfig::default();
    let mut group = c.benchmark_group("render/instructions");
    for n in [8usize, 20, 200] {
        let waterfall = reduce(&items(n)).expect("bench input reduces");
        group.bench_with_input(BenchmarkId::from_parameter(n), &waterfall, |b, w| {
            b.iter(|| to_draw_instructions(black_box(w), &config))
        });
    }
    group.finish();
}

fn bench_text(c: &mut Criterion) {
    let config = RenderConfig::default();
    let waterfall = reduce(&items(20)).expect("bench input reduces");
    let domain = Domain::for_waterfall(&waterfall, config.headroom).expect("bench domain");
    let instructions = to_draw_instructions_in(&waterfall, &domain, &config);
    c.bench_function("render/text_20x60", |b| {
        b.iter(|| render_bars(black_box(&instructions), &domain, 60))
    });
}

criterion_group!(benches, bench_instructions, bench_text);
criterion_main!(benches);
