// Unit formatting: bytes, percentages, elapsed time.
//
// All rounding goes through `round_half_up` so output never depends on the
// float formatter's own tie-breaking.

const BYTE_UNITS: &[u8] = b"KMGTPE";

/// Rounds `value` to `digits` decimals, ties away from zero.
fn round_half_up(value: f64, digits: usize) -> f64 {
    let scale = 10f64.powi(digits as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

fn clamp_digits(digits: i32) -> usize {
    digits.clamp(0, 10) as usize
}

/// Human readable byte count using binary (1024) scaling, e.g. `1.5 KB`.
///
/// Magnitudes under 1024 render as a plain integer with unit `B`. The sign
/// is preserved and `i64::MIN` is treated as `i64::MAX` in magnitude.
/// `digits` is clamped to `[0, 10]`.
pub fn humanize_bytes(value: i64, digits: i32) -> String {
    let magnitude = if value == i64::MIN {
        i64::MAX
    } else {
        value.abs()
    };
    if magnitude < 1024 {
        return format!("{} B", value);
    }

    let digits = clamp_digits(digits);
    let sign = if value < 0 { -1.0 } else { 1.0 };
    let magnitude = magnitude as f64;
    // Step up while the rounded amount would read 1024 or more.
    let mut unit = 0;
    loop {
        let amount = round_half_up(magnitude / 1024f64.powi(unit as i32 + 1), digits);
        if amount < 1024.0 || unit == BYTE_UNITS.len() - 1 {
            return format!("{:.*} {}B", digits, sign * amount, BYTE_UNITS[unit] as char);
        }
        unit += 1;
    }
}

/// [`humanize_bytes`] with one decimal place.
pub fn humanize_bytes_default(value: i64) -> String {
    humanize_bytes(value, 1)
}

/// Fraction (0.0..=1.0) as a percentage string, e.g. `0.5` -> `50.0%`.
pub fn to_percent_string(fraction: f64, digits: i32) -> String {
    let digits = clamp_digits(digits);
    let percent = round_half_up(fraction * 100.0, digits);
    // -0.0 prints as "-0.0"
    let percent = if percent == 0.0 { 0.0 } else { percent };
    format!("{:.*}%", digits, percent)
}

/// [`to_percent_string`] with one decimal place.
pub fn to_percent_string_default(fraction: f64) -> String {
    to_percent_string(fraction, 1)
}

/// Elapsed seconds as `N days, HH:MM:SS`.
pub fn format_elapsed_secs(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    format!("{} days, {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}
