//! Number formatting for labels and captions.
//!
//! Thousands separators and fixed decimal precision, with `-0` normalized.

/// Format a number with thousands separators and `decimals` fraction digits.
///
/// ```
/// use trueno_freqs::format::format_num;
///
/// assert_eq!(format_num(1234567.891, 2), "1,234,567.89");
/// assert_eq!(format_num(-1200.0, 0), "-1,200");
/// ```
#[must_use]
pub fn format_num(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = round_to(value, decimals);
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{:.*}", decimals, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + text.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Format a count: integral values without decimals, weighted sums with two.
#[must_use]
pub fn format_count(value: f64) -> String {
    if is_integral(value) {
        format_num(value, 0)
    } else {
        format_num(value, 2)
    }
}

/// Format a percentage, dropping trailing zero decimals (`50%`, `33.33%`).
#[must_use]
pub fn format_pct(value: f64) -> String {
    let fixed = format_num(value, 2);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    format!("{trimmed}%")
}

/// Round to a fixed number of decimals.
#[must_use]
pub fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10_f64.powi(i32::try_from(decimals.min(12)).unwrap_or(12));
    (value * factor).round() / factor
}

fn is_integral(x: f64) -> bool {
    x.is_finite() && (x - x.round()).abs() <= 1e-9 * x.abs().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_thousands() {
        assert_eq!(format_num(0.0, 0), "0");
        assert_eq!(format_num(999.0, 0), "999");
        assert_eq!(format_num(1000.0, 0), "1,000");
        assert_eq!(format_num(1234567.0, 0), "1,234,567");
    }

    #[test]
    fn formats_decimals() {
        assert_eq!(format_num(1234.5, 2), "1,234.50");
        assert_eq!(format_num(0.125, 1), "0.1");
    }

    #[test]
    fn normalizes_negative_zero() {
        assert_eq!(format_num(-0.0, 0), "0");
        assert_eq!(format_num(-0.001, 2), "0.00");
    }

    #[test]
    fn formats_counts() {
        assert_eq!(format_count(3.0), "3");
        assert_eq!(format_count(2.5), "2.50");
        assert_eq!(format_count(12000.0), "12,000");
    }

    #[test]
    fn formats_percentages() {
        assert_eq!(format_pct(50.0), "50%");
        assert_eq!(format_pct(33.33), "33.33%");
        assert_eq!(format_pct(12.5), "12.5%");
        assert_eq!(format_pct(100.0), "100%");
    }

    #[test]
    fn non_finite_passthrough() {
        assert_eq!(format_num(f64::INFINITY, 2), "inf");
    }
}
