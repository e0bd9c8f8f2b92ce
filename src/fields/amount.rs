//! Fixed-point rendering of the withdrawal amount.

/// The amount field is an 18-decimal token quantity
pub const AMOUNT_DECIMALS: u32 = 18;

/// Full fixed-point rendering: always `int.frac` with exactly `decimals`
/// fractional digits (`1000000000000000000` at 18 → `1.000000000000000000`)
pub fn format_fixed_point(value: u64, decimals: u32) -> String {
    let digits = value.to_string();
    if decimals == 0 {
        return digits;
    }

    let scale = decimals as usize;
    if digits.len() > scale {
        let (int, frac) = digits.split_at(digits.len() - scale);
        format!("{}.{}", int, frac)
    } else {
        format!("0.{:0>width$}", digits, width = scale)
    }
}

/// Drop trailing fractional zeros and a dangling decimal point.
/// The integer part is left alone, so zero stays `"0"`.
pub fn trim_fixed_point(rendered: &str) -> &str {
    if !rendered.contains('.') {
        return rendered;
    }
    rendered.trim_end_matches('0').trim_end_matches('.')
}

/// Shortest exact decimal form of a fixed-point value
pub fn format_amount(value: u64, decimals: u32) -> String {
    trim_fixed_point(&format_fixed_point(value, decimals)).to_string()
}

/// `"<ticker> <amount>"` as shown on the confirmation screen
pub fn format_with_ticker(ticker: &str, value: u64, decimals: u32) -> String {
    format!("{} {}", ticker, format_amount(value, decimals))
}
