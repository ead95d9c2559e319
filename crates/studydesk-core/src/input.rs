//! Lenient numeric input.

/// Parse a minutes field the way a number input is read: anything that is
/// not a finite number counts as 0, fractions are truncated.
pub fn parse_minutes(input: &str) -> i64 {
    match input.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n.trunc() as i64,
        _ => 0,
    }
}

/// Clamp a parsed minutes value into `[min, max]`.
pub fn clamp_minutes(value: i64, min: u32, max: u32) -> u32 {
    value.clamp(i64::from(min), i64::from(max)) as u32
}
