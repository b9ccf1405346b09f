//! Conversions between host text and numbers
//!
//! Host elements carry text. These helpers define how a number is written to
//! a host and how host text is read back, matching the usual input-element
//! conventions: integers print without a fraction, blank text reads as zero.

/// Format a number for a host element's raw value
///
/// Integral values print without a fractional part (`10`, not `10.0`), and
/// negative zero prints as `0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// Format a number with a fixed count of fractional digits
pub fn format_fixed(value: f64, decimals: u32) -> String {
    if decimals == 0 || !value.is_finite() {
        return format_number(value);
    }
    format!("{:.*}", decimals as usize, value)
}

/// Read a host raw value as a finite number
///
/// Surrounding whitespace is ignored and blank text reads as `0`. Returns
/// `None` for anything that is not a finite number.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Round to `decimals` fractional digits
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(10.5), "10.5");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(10.5, 2), "10.50");
        assert_eq!(format_fixed(3.0, 0), "3");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("  7.25 "), Some(7.25));
        assert_eq!(parse_number("1e2"), Some(100.0));
        assert_eq!(parse_number(""), Some(0.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
        assert_eq!(round_to(0.1 + 0.2, 2), 0.3);
    }
}
