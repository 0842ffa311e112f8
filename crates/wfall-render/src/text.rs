//! Plain-text horizontal bars for terminals and logs.
//!
//! One row per instruction: category padded to the widest category (by
//! display width), a track of `width` cells spanning the domain, then the
//! value label. Totals fill with `█`, inflows with `▓`, outflows with `░`.
//! When the domain crosses zero, empty cells on the zero column show `│`.

use unicode_width::UnicodeWidthStr;
use wfall_core::{Domain, ItemKind};

use crate::draw::DrawInstruction;

const TOTAL: char = '█';
const INFLOW: char = '▓';
const OUTFLOW: char = '░';
const ZERO: char = '│';

fn glyph(kind: ItemKind) -> char {
    match kind {
        ItemKind::Inflow => INFLOW,
        ItemKind::Outflow => OUTFLOW,
        ItemKind::Start | ItemKind::Subtotal | ItemKind::End => TOTAL,
    }
}

/// Map a value onto a cell boundary in `0..=width`.
fn cell(value: f64, domain: &Domain, width: usize) -> usize {
    let span = domain.span();
    if !(span > 0.0) {
        return 0;
    }
    let ratio = ((value - domain.min) / span).clamp(0.0, 1.0);
    (ratio * width as f64).round() as usize
}

fn pad(text: &str, to: usize) -> String {
    let fill = to.saturating_sub(text.width());
    let mut out = String::with_capacity(text.len() + fill);
    out.push_str(text);
    out.extend(std::iter::repeat_n(' ', fill));
    out
}

fn track(instruction: &DrawInstruction, domain: &Domain, width: usize) -> String {
    let bar = instruction.bar;
    let mut lo = cell(bar.base, domain, width);
    let mut hi = cell(bar.base + bar.height, domain, width);
    // Keep non-zero bars visible.
    if bar.height > 0.0 && hi == lo {
        if hi < width {
            hi += 1;
        } else if lo > 0 {
            lo -= 1;
        }
    }
    let zero = (domain.min < 0.0 && domain.max > 0.0)
        .then(|| cell(0.0, domain, width).min(width.saturating_sub(1)));
    let fill = glyph(instruction.kind);

    (0..width)
        .map(|i| {
            if (lo..hi).contains(&i) {
                fill
            } else if zero == Some(i) {
                ZERO
            } else {
                ' '
            }
        })
        .collect()
}

/// Render instructions as text rows joined by `\n`. A zero `width` prints
/// categories and labels only.
#[must_use]
pub fn render_bars(instructions: &[DrawInstruction], domain: &Domain, width: usize) -> String {
    let label_width = instructions
        .iter()
        .map(|i| i.category.width())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (row, instruction) in instructions.iter().enumerate() {
        if row > 0 {
            out.push('\n');
        }
        out.push_str(&pad(&instruction.category, label_width));
        out.push_str(" │");
        out.push_str(&track(instruction, domain, width));
        out.push_str("│ ");
        out.push_str(&instruction.value_label);
    }
    out
}
