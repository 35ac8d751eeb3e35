//! # Number Formatting
//!
//! Locale-aware rendering of result and input values.
//!
//! - exact zero renders with three decimals (`0,000`)
//! - magnitudes below `0.001` keep three significant digits and no grouping,
//!   so `7.58e-7` does not collapse to zero
//! - everything else renders with three decimals and thousands grouping
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::format::{format_number, format_number_with, NumberLocale};
//!
//! assert_eq!(format_number(0.0), "0,000");
//! assert_eq!(format_number(1234.5), "1.234,500");
//! assert_eq!(format_number(0.0000007582), "0,000000758");
//! assert_eq!(format_number_with(1234.5, &NumberLocale::EN_US), "1,234.500");
//! ```

use serde::{Deserialize, Serialize};

/// Values with a magnitude below this use significant digits.
pub const SMALL_NUMBER_THRESHOLD: f64 = 0.001;

const FIXED_DECIMALS: usize = 3;
const SIGNIFICANT_DIGITS: i32 = 3;

/// Decimal and grouping separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberLocale {
    pub decimal_separator: char,
    pub group_separator: char,
}

impl NumberLocale {
    /// Brazilian Portuguese: `1.234,567`
    pub const PT_BR: NumberLocale = NumberLocale {
        decimal_separator: ',',
        group_separator: '.',
    };

    /// US English: `1,234.567`
    pub const EN_US: NumberLocale = NumberLocale {
        decimal_separator: '.',
        group_separator: ',',
    };

    /// Resolve a locale tag such as `pt-BR` or `en_US`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Some(Self::PT_BR),
            "en-us" | "en" => Some(Self::EN_US),
            _ => None,
        }
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        NumberLocale::PT_BR
    }
}

/// Format with the default (`pt-BR`) locale.
pub fn format_number(value: f64) -> String {
    format_number_with(value, &NumberLocale::default())
}

/// Format `value` following the zero / small / fixed rules above.
pub fn format_number_with(value: f64, locale: &NumberLocale) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    if value == 0.0 {
        return format!("0{}{}", locale.decimal_separator, "0".repeat(FIXED_DECIMALS));
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    let body = if magnitude < SMALL_NUMBER_THRESHOLD {
        significant(magnitude, locale)
    } else {
        fixed_grouped(magnitude, locale)
    };

    format!("{sign}{body}")
}

/// Up to three significant digits, trailing zeros dropped, no grouping.
fn significant(magnitude: f64, locale: &NumberLocale) -> String {
    let exponent = magnitude.log10().floor() as i32;
    let decimals = (SIGNIFICANT_DIGITS - 1 - exponent).max(0) as usize;
    let (int_part, frac_part) = round_half_expand(magnitude, decimals);

    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part
    } else {
        format!("{int_part}{}{frac_part}", locale.decimal_separator)
    }
}

/// Three fixed decimals with thousands grouping.
fn fixed_grouped(magnitude: f64, locale: &NumberLocale) -> String {
    let (int_part, frac_part) = round_half_expand(magnitude, FIXED_DECIMALS);

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(locale.group_separator);
        }
        grouped.push(digit);
    }

    format!("{grouped}{}{frac_part}", locale.decimal_separator)
}

/// Integer and fraction digits of a non-negative `magnitude` rounded to
/// `decimals` places, ties away from zero.
///
/// Rounding works on the shortest decimal form that round-trips (`1.0005`,
/// not its binary expansion `1.000499..`), so `0.0625` gives `0.063` and
/// `1.0005` gives `1.001`.
fn round_half_expand(magnitude: f64, decimals: usize) -> (String, String) {
    let scientific = format!("{magnitude:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));

    let mut digits: Vec<u8> = mantissa
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();
    // Count of digits before the decimal point; negative means leading zeros after it
    let mut point = exponent.parse::<i32>().unwrap_or(0) + 1;

    let keep = point + decimals as i32;
    if keep < 0 {
        digits.clear();
        point = 0;
    } else if (keep as usize) < digits.len() {
        let round_up = digits[keep as usize] >= 5;
        digits.truncate(keep as usize);
        if round_up {
            let mut i = digits.len();
            loop {
                if i == 0 {
                    digits.insert(0, 1);
                    point += 1;
                    break;
                }
                i -= 1;
                if digits[i] == 9 {
                    digits[i] = 0;
                } else {
                    digits[i] += 1;
                    break;
                }
            }
        }
    }

    let digit_at = |i: i32| -> char {
        usize::try_from(i)
            .ok()
            .and_then(|i| digits.get(i))
            .map_or('0', |d| char::from(b'0' + d))
    };

    let int_part = if point > 0 {
        (0..point).map(digit_at).collect()
    } else {
        "0".to_string()
    };
    let frac_part = (point..point + decimals as i32).map(digit_at).collect();
    (int_part, frac_part)
}
