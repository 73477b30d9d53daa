// Formatting and parsing helpers shared by the menu, the loader and the
// terminal output.
use crate::error::CalcError;
use num_format::{Locale, ToFormattedString};

/// Parse a quantity typed by the user or read from a CSV cell.
///
/// - Trims whitespace and strips thousands separators (`1,200`).
/// - An empty cell counts as 0.
/// - Anything that is not a whole, non-negative number is `InvalidInput`.
pub fn parse_quantity(item: &str, s: &str) -> Result<i64, CalcError> {
    let s = s.trim().replace(',', "");
    if s.is_empty() {
        return Ok(0);
    }
    let value = s
        .parse::<i64>()
        .map_err(|_| CalcError::invalid(item, format!("'{}' is not a whole number", s)))?;
    if value < 0 {
        return Err(CalcError::invalid(
            item,
            format!("quantity {} is negative", value),
        ));
    }
    Ok(value)
}

/// Split `NAME=QTY` into its parts. The name may itself contain spaces,
/// commas or slashes; only the last `=` separates.
pub fn split_assignment(s: &str) -> Option<(&str, &str)> {
    let (name, qty) = s.rsplit_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, qty.trim()))
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus locale thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_currency(n: f64) -> String {
    if n.is_sign_negative() && n != 0.0 {
        format!("-${}", format_number(n.abs(), 2))
    } else {
        format!("${}", format_number(n, 2))
    }
}

/// `0.4` -> `40%`; keeps decimals only when the rate needs them.
pub fn format_percent(rate: f64) -> String {
    let pct = rate * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{}%", pct.round() as i64)
    } else {
        format!("{}%", format_number(pct, 2))
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
