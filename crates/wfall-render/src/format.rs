//! Compact currency and percentage labels (`$12.3K`, `-$1.2M`, `40.0%`).
//!
//! Scale suffixes roll over when rounding would print four integer digits, so
//! `999_999` reads `$1.0M` rather than `$1000.0K`.

const SCALES: [(f64, &str); 4] = [(1.0, ""), (1e3, "K"), (1e6, "M"), (1e9, "B")];

/// Magnitude text without sign or symbol. The unscaled tier prints no
/// decimals (`$950`).
fn compact_magnitude(abs: f64, decimals: usize) -> String {
    let mut idx = SCALES.iter().rposition(|(div, _)| abs >= *div).unwrap_or(0);
    loop {
        let (div, suffix) = SCALES[idx];
        let places = if suffix.is_empty() { 0 } else { decimals };
        let text = format!("{:.*}", places, abs / div);
        let rolled = text.parse::<f64>().is_ok_and(|v| v >= 1000.0);
        if rolled && idx + 1 < SCALES.len() {
            idx += 1;
            continue;
        }
        return format!("{text}{suffix}");
    }
}

fn is_zero_text(text: &str) -> bool {
    !text.chars().any(|c| c.is_ascii_digit() && c != '0')
}

/// `$12.3K`, `-$1.2M`, `$950`.
#[must_use]
pub fn compact_currency_with(value: f64, symbol: &str, decimals: usize) -> String {
    let text = compact_magnitude(value.abs(), decimals);
    if value < 0.0 && !is_zero_text(&text) {
        format!("-{symbol}{text}")
    } else {
        format!("{symbol}{text}")
    }
}

/// [`compact_currency_with`] using `$` and one decimal.
#[must_use]
pub fn compact_currency(value: f64) -> String {
    compact_currency_with(value, "$", 1)
}

/// Like [`compact_currency_with`] but positive amounts carry a `+`.
#[must_use]
pub fn signed_compact_currency(value: f64, symbol: &str, decimals: usize) -> String {
    let text = compact_currency_with(value, symbol, decimals);
    if value > 0.0 && !is_zero_text(&text) {
        format!("+{text}")
    } else {
        text
    }
}

/// `40.0%` from a value already expressed in percent.
#[must_use]
pub fn percent(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}
