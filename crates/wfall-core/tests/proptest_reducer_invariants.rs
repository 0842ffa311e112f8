//! Property-based invariant tests for the waterfall reducer and domain.
//!
//! These must hold for **any** well-formed item sequence:
//!
//! 1. Conservation: final total = start + inflows - outflows.
//! 2. Inserting a subtotal never changes the final total.
//! 3. Reduction is deterministic down to the bit.
//! 4. Outflow sign convention does not affect geometry.
//! 5. Magnitudes are never negative; one segment per item, in order.
//! 6. Every bar fits inside the computed domain.

use proptest::prelude::*;
use wfall_core::{Domain, ItemKind, WaterfallItem, reduce};

// ── Helpers ─────────────────────────────────────────────────────────────

fn amount() -> impl Strategy<Value = f64> {
    (0i64..=2_000_000).prop_map(|cents| cents as f64 / 100.0)
}

fn body_item() -> impl Strategy<Value = WaterfallItem> {
    prop_oneof![
        amount().prop_map(|v| WaterfallItem::inflow("in", v)),
        amount().prop_map(|v| WaterfallItem::outflow("out", v)),
        amount().prop_map(|v| WaterfallItem::outflow("out-neg", -v)),
        Just(WaterfallItem::subtotal("sub")),
    ]
}

fn sequence() -> impl Strategy<Value = Vec<WaterfallItem>> {
    (
        proptest::option::of(amount()),
        proptest::collection::vec(body_item(), 0..=20),
        any::<bool>(),
    )
        .prop_map(|(start, body, end)| {
            let mut items = Vec::with_capacity(body.len() + 2);
            if let Some(v) = start {
                items.push(WaterfallItem::start("start", v));
            }
            items.extend(body);
            if end {
                items.push(WaterfallItem::end("end"));
            }
            items
        })
        .prop_filter("non-empty", |items| !items.is_empty())
}

fn expected_total(items: &[WaterfallItem]) -> f64 {
    items.iter().fold(0.0, |acc, item| match item.kind {
        ItemKind::Start => item.value,
        ItemKind::Inflow => acc + item.value.abs(),
        ItemKind::Outflow => acc - item.value.abs(),
        ItemKind::Subtotal | ItemKind::End => acc,
    })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Conservation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn final_total_is_conserved(items in sequence()) {
        let w = reduce(&items).unwrap();
        prop_assert_eq!(w.final_total.to_bits(), expected_total(&items).to_bits());
        prop_assert_eq!(
            w.segments.last().map(|s| s.running_total_after.to_bits()),
            Some(w.final_total.to_bits())
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Subtotal insertion
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn subtotal_insertion_keeps_final_total(items in sequence(), at in any::<prop::sample::Index>()) {
        let before = reduce(&items).unwrap();
        let mut with_sub = items.clone();
        // Index 0 may hold the start item, which must stay first.
        let pos = 1 + at.index(with_sub.len());
        with_sub.insert(pos.min(with_sub.len()), WaterfallItem::subtotal("checkpoint"));
        let after = reduce(&with_sub).unwrap();
        prop_assert_eq!(before.final_total.to_bits(), after.final_total.to_bits());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reduce_is_bit_identical(items in sequence()) {
        let a = reduce(&items).unwrap();
        let b = reduce(&items).unwrap();
        prop_assert_eq!(a, b);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Sign convention
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn outflow_sign_does_not_matter(items in sequence()) {
        let flipped: Vec<WaterfallItem> = items
            .iter()
            .cloned()
            .map(|mut item| {
                if item.kind == ItemKind::Outflow {
                    item.value = -item.value;
                }
                item
            })
            .collect();
        let a = reduce(&items).unwrap();
        let b = reduce(&flipped).unwrap();
        for (x, y) in a.segments.iter().zip(&b.segments) {
            prop_assert_eq!(x.base_offset.to_bits(), y.base_offset.to_bits());
            prop_assert_eq!(x.magnitude.to_bits(), y.magnitude.to_bits());
            prop_assert_eq!(x.is_positive, y.is_positive);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Geometry shape
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn segments_follow_items(items in sequence()) {
        let w = reduce(&items).unwrap();
        prop_assert_eq!(w.len(), items.len());
        for (seg, item) in w.segments.iter().zip(&items) {
            prop_assert!(seg.magnitude >= 0.0);
            prop_assert_eq!(&seg.label, &item.label);
            prop_assert_eq!(seg.kind, item.kind);
        }
        for pair in w.segments.windows(2) {
            prop_assert_eq!(
                pair[1].running_total_before.to_bits(),
                pair[0].running_total_after.to_bits()
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Domain containment
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn bars_fit_in_domain(items in sequence(), headroom in 1.0f64..=1.5) {
        let w = reduce(&items).unwrap();
        let d = Domain::for_waterfall(&w, headroom).unwrap();
        prop_assert!(d.min <= 0.0 && d.max >= 0.0);
        for seg in &w.segments {
            prop_assert!(d.contains(seg.base_offset), "{} < {}", seg.base_offset, d.min);
            prop_assert!(d.contains(seg.top()), "{} > {}", seg.top(), d.max);
        }
    }
}
