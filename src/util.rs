// Parsing and formatting helpers.
//
// This module centralizes the forgiving cell handling so the loader can
// assume every numeric column already holds an `f64`.
use num_format::{Locale, ToFormattedString};

/// Parse the longest numeric prefix of a cell, the way spreadsheet exports are
/// usually read: `"12.5 units"` gives `12.5`, `"n/a"` gives `None`.
///
/// - Trims whitespace first.
/// - Accepts an optional sign, digits with at most one decimal point, and an
///   exponent only when digits follow it.
/// - Returns `None` when no digit is found.
pub fn parse_f64_prefix(s: &str) -> Option<f64> {
    let s = s.trim();
    let bytes = s.as_bytes();
    let mut end = 0usize;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut digits = 0usize;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if digits == 0 {
        return None;
    }
    // Exponent only counts when it is complete, e.g. "1e" stays "1".
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok()
}

/// Best-effort numeric coercion: anything unparseable (or non-finite) becomes `0.0`.
///
/// A genuine zero and a coercion failure are indistinguishable afterwards.
pub fn coerce_number(s: &str) -> f64 {
    match parse_f64_prefix(s) {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

pub fn average(v: &[f64]) -> f64 {
    // Arithmetic mean; 0 for an empty slice so callers never see NaN.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Beyond i64 range the digits are left ungrouped rather than lost.
    let mut res = match int_part.parse::<i64>() {
        Ok(int_val) => int_val.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Display form of a KPI reading: whole numbers without decimals, others with two.
pub fn format_value(n: f64) -> String {
    if n.fract() == 0.0 {
        format_number(n, 0)
    } else {
        format_number(n, 2)
    }
}

/// `+50.0%`, `-3.2%`, `0.0%`: the sign is only spelled out for gains.
pub fn format_percentage(n: f64) -> String {
    let n = if n == 0.0 { 0.0 } else { n };
    let sign = if n > 0.0 { "+" } else { "" };
    format!("{}{:.1}%", sign, n)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
