//! Money rendering for displayed balances and year counts.
//!
//! Rounding is applied to the exact binary value of the `f64`, with exact
//! ties rounded half away from zero. `1234.005` is stored slightly above the
//! tie and renders as `1,234.01`; `0.125` is an exact tie and renders `0.13`.

const GROUP_SEPARATOR: char = ',';

/// Fixed-point rendering with `digits` decimals.
pub fn to_fixed(value: f64, digits: usize) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    match exact_tie_units(magnitude, digits) {
        Some(units) => {
            let scale = 10u128.pow(digits as u32);
            let whole = units / scale;
            let frac = units % scale;
            if digits == 0 {
                format!("{sign}{whole}")
            } else {
                format!("{sign}{whole}.{frac:0digits$}")
            }
        }
        None => format!("{sign}{magnitude:.digits$}"),
    }
}

/// A value can only sit exactly on a rounding tie at `digits` decimals when it
/// is a multiple of `2^-(digits + 1)`. For those values the decimal expansion
/// is short, so the rounding is done in integers; everything else is left to
/// the standard formatter, which rounds the exact value to nearest.
fn exact_tie_units(magnitude: f64, digits: usize) -> Option<u128> {
    if digits > 20 {
        return None;
    }
    let exp = digits as i32 + 1;
    let scaled = magnitude * 2f64.powi(exp);
    if !scaled.is_finite() || scaled.fract() != 0.0 || scaled > u64::MAX as f64 {
        return None;
    }
    // magnitude == scaled / 2^exp == scaled * 5^exp / 10^exp
    let tenths = (scaled as u128).checked_mul(5u128.pow(exp as u32))?;
    Some((tenths + 5) / 10)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// Two decimals with `,` thousands grouping, e.g. `-1,234.50`.
pub fn format_money(amount: f64) -> String {
    let fixed = to_fixed(amount, 2);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    match unsigned.split_once('.') {
        Some((int_part, frac_part)) => {
            format!("{sign}{}.{frac_part}", group_thousands(int_part))
        }
        None => format!("{sign}{}", group_thousands(unsigned)),
    }
}

/// Compact form for large figures: `999.500`, `12k 345.063`, `1M 234k567.891`.
///
/// The whole part is truncated, split into millions / thousands / units, and
/// a three-digit fraction of the magnitude is always appended.
pub fn format_abbr_money(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let magnitude = amount.abs();
    // Tiers stay in f64 so amounts past u64::MAX are not clamped.
    let whole = magnitude.floor();

    let body = if whole < 1_000.0 {
        format!("{whole:.0}")
    } else if whole < 1_000_000.0 {
        let thousands = (whole / 1_000.0).floor();
        let rest = whole % 1_000.0;
        if rest == 0.0 {
            format!("{thousands:.0}k")
        } else {
            format!("{thousands:.0}k {rest:03.0}")
        }
    } else {
        let millions = (whole / 1_000_000.0).floor();
        let thousands = ((whole % 1_000_000.0) / 1_000.0).floor();
        let rest = whole % 1_000.0;
        format!("{millions:.0}M {thousands:.0}k{rest:03.0}")
    };

    let fraction = to_fixed(magnitude.fract(), 3);
    let tail = fraction
        .split_once('.')
        .map_or("000", |(_, decimals)| decimals);

    format!("{sign}{body}.{tail}")
}

/// Display string for a "years remaining" figure.
pub fn format_years(years: f64) -> String {
    format_money(years)
}

/// Indices of characters in `current` that differ from the character at the
/// same position in `previous` (or have no counterpart there).
pub fn changed_positions(previous: &str, current: &str) -> Vec<usize> {
    let mut prev = previous.chars();
    current
        .chars()
        .enumerate()
        .filter_map(|(i, c)| (prev.next() != Some(c)).then_some(i))
        .collect()
}
