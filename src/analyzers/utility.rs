/// Rounds to `decimals` places, halves to even (`6.25` → `6.2`).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Formats a total without a trailing `.0` for whole numbers.
pub fn format_total(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}
