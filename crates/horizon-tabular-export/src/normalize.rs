//! Value normalization for exported cells.
//!
//! Spreadsheet applications silently turn long numeric identifiers into
//! scientific notation. Every exported value goes through
//! [`normalize_value`] so large numbers are written as plain digits.
//!
//! | Raw value                    | Exported as        |
//! |------------------------------|--------------------|
//! | `Null`                       | empty string       |
//! | `99999999999999` (number)    | `99999999999999`   |
//! | `"9.9999999999999e13"`       | `99999999999999`   |
//! | `"201234567890"` (phone)     | `+201234567890`    |
//! | anything else                | its string form    |

use std::sync::OnceLock;

use horizon_tabular_core::FieldValue;
use regex::Regex;

/// Magnitude above which numbers are forced into fixed-point integer form.
pub const LARGE_NUMBER_THRESHOLD: f64 = 999_999_999.0;

/// Minimum digit count of a phone number.
pub const MIN_PHONE_DIGITS: usize = 8;

fn exponent_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)[eE][+-]?\d+$").expect("exponent pattern is valid")
    })
}

/// Returns `true` if `text` is a number written in exponential notation.
pub fn is_exponential(text: &str) -> bool {
    exponent_pattern().is_match(text.trim())
}

/// Returns `true` if `text` looks like a phone number: only ASCII digits, at
/// least [`MIN_PHONE_DIGITS`] of them.
pub fn is_phone_number(text: &str) -> bool {
    text.len() >= MIN_PHONE_DIGITS && text.bytes().all(|b| b.is_ascii_digit())
}

/// Produces the display string of one exported cell.
///
/// `phone_column` marks values of a phone column; those that look like a
/// phone number get a leading `+`.
pub fn normalize_value(value: &FieldValue, phone_column: bool) -> String {
    let text = match value {
        FieldValue::Null => return String::new(),
        FieldValue::Float(n) => format_number(*n),
        FieldValue::Text(s) if is_exponential(s) => expand_exponential(s),
        other => other.display_string(),
    };

    if phone_column && is_phone_number(&text) {
        format!("+{text}")
    } else {
        text
    }
}

/// Renders a float without exponent, as an integer when it is integral or
/// beyond the large-number threshold. Halves round away from zero.
fn format_number(n: f64) -> String {
    if n.is_finite() && (n.fract() == 0.0 || n.abs() > LARGE_NUMBER_THRESHOLD) {
        let n = n.round();
        if n == 0.0 {
            return "0".to_string();
        }
        format!("{n:.0}")
    } else {
        FieldValue::Float(n).display_string()
    }
}

fn expand_exponential(text: &str) -> String {
    match text.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => format_number(n),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_is_empty() {
        assert_eq!(normalize_value(&FieldValue::Null, false), "");
        assert_eq!(normalize_value(&FieldValue::Null, true), "");
    }

    #[test]
    fn test_large_integer_stays_plain() {
        let value = FieldValue::Int(99_999_999_999_999);
        assert_eq!(normalize_value(&value, false), "99999999999999");

        let value = FieldValue::Float(99_999_999_999_999.0);
        assert_eq!(normalize_value(&value, false), "99999999999999");
    }

    #[test]
    fn test_large_float_is_rounded_to_integer() {
        let value = FieldValue::Float(12_345_678_901.6);
        assert_eq!(normalize_value(&value, false), "12345678902");
    }

    #[test]
    fn test_large_float_half_rounds_away_from_zero() {
        let up = FieldValue::Float(1_234_567_890.5);
        assert_eq!(normalize_value(&up, false), "1234567891");
        let down = FieldValue::Float(-1_234_567_890.5);
        assert_eq!(normalize_value(&down, false), "-1234567891");
        assert_eq!(normalize_value(&FieldValue::Float(2_000_000_000.5), false), "2000000001");
    }

    #[test]
    fn test_small_float_keeps_fraction() {
        assert_eq!(normalize_value(&FieldValue::Float(2.5), false), "2.5");
    }

    #[test]
    fn test_exponential_text_is_expanded() {
        assert!(is_exponential("9.9999999999999e13"));
        assert!(is_exponential("1E+21"));
        assert!(!is_exponential("e13"));
        assert!(!is_exponential("12e"));

        let value = FieldValue::from("9.9999999999999e13");
        assert_eq!(normalize_value(&value, false), "99999999999999");
        let value = FieldValue::from("1.5E3");
        assert_eq!(normalize_value(&value, false), "1500");
    }

    #[test]
    fn test_phone_gets_plus() {
        let value = FieldValue::from("201234567890");
        assert_eq!(normalize_value(&value, true), "+201234567890");

        let value = FieldValue::Int(201_234_567_890);
        assert_eq!(normalize_value(&value, true), "+201234567890");
    }

    #[test]
    fn test_phone_rules() {
        assert_eq!(normalize_value(&FieldValue::from("1234567"), true), "1234567");
        assert_eq!(
            normalize_value(&FieldValue::from("+201234567890"), true),
            "+201234567890"
        );
        assert_eq!(
            normalize_value(&FieldValue::from("201234567890"), false),
            "201234567890"
        );
    }

    #[test]
    fn test_other_values_pass_through() {
        assert_eq!(normalize_value(&FieldValue::from(true), false), "true");
        assert_eq!(normalize_value(&FieldValue::from("a,b"), false), "a,b");
        assert_eq!(normalize_value(&FieldValue::Int(-42), false), "-42");
    }
}
