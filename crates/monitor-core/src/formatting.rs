/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use monitor_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    // Group the absolute value, then re-apply the sign.
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a tiny epsilon before rounding so exact binary midpoints
    // round away from zero.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = format!("{:.0}", rounded.trunc());
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part);

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` starts with "0.", e.g. "0.50".
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a tank level the way it appears in exported rows: no grouping,
/// no trailing `.0` for whole liters, at most two decimals otherwise.
///
/// # Examples
///
/// ```
/// use monitor_core::formatting::format_level;
///
/// assert_eq!(format_level(9400.0), "9400");
/// assert_eq!(format_level(9312.5), "9312.5");
/// assert_eq!(format_level(0.126), "0.13");
/// ```
pub fn format_level(level: f64) -> String {
    if level == 0.0 {
        return "0".to_string();
    }
    if level.fract() == 0.0 {
        // Whole values print through `f64` formatting so huge levels keep every digit.
        return format!("{:.0}", level);
    }
    let fixed = format!("{:.2}", level);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Format a volume for on-screen summaries: thousands separators plus the
/// unit, e.g. `"1,200 liters"`.
///
/// Whole volumes print without decimals; fractional ones keep two.
pub fn format_liters(volume: f64) -> String {
    let decimals = if volume.fract() == 0.0 { 0 } else { 2 };
    format!("{} liters", format_number(volume, decimals))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
