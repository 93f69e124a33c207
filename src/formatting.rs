//! Display formatting for the zh-CN dashboard conventions: thousands
//! grouping, 万-scaled area values, and short month/day labels. Absent
//! observations render as a placeholder token, never as zero.

use chrono::{Datelike, NaiveDate};

/// Display token for a metric with no observation that day.
pub const PLACEHOLDER: &str = "—";

/// Values at or above this are scaled down to 万 (ten-thousand) units.
const WAN: f64 = 10_000.0;

pub fn format_area(value: Option<f64>) -> String {
    value.map_or_else(
        || PLACEHOLDER.to_string(),
        |area| {
            if area >= WAN {
                format!("{:.2}万㎡", area / WAN)
            } else {
                format!("{}㎡", group_thousands(&format!("{area:.2}")))
            }
        },
    )
}

pub fn format_count(value: Option<u64>) -> String {
    value.map_or_else(
        || PLACEHOLDER.to_string(),
        |count| group_thousands(&count.to_string()),
    )
}

/// Short `M/D` label used for table rows and chart ticks.
pub fn format_month_day(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// Inserts thousands separators into the integer part of a plain decimal
/// string produced by `format!`/`to_string`.
pub fn group_thousands(number: &str) -> String {
    let (int_part, frac_part) = number
        .split_once('.')
        .map_or((number, None), |(int_part, frac)| (int_part, Some(frac)));
    let (sign, digits) = int_part
        .strip_prefix('-')
        .map_or(("", int_part), |rest| ("-", rest));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    frac_part.map_or_else(
        || format!("{sign}{grouped}"),
        |frac| format!("{sign}{grouped}.{frac}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_absent_renders_placeholder() {
        assert_eq!(format_area(None), "—");
    }

    #[test]
    fn area_below_wan_is_grouped_with_two_decimals() {
        assert_eq!(format_area(Some(9999.0)), "9,999.00㎡");
        assert_eq!(format_area(Some(42.5)), "42.50㎡");
        assert_eq!(format_area(Some(0.0)), "0.00㎡");
    }

    #[test]
    fn area_at_or_above_wan_is_scaled() {
        assert_eq!(format_area(Some(12_345.6)), "1.23万㎡");
        assert_eq!(format_area(Some(10_000.0)), "1.00万㎡");
        assert_eq!(format_area(Some(422_446.3)), "42.24万㎡");
    }

    #[test]
    fn count_absent_renders_placeholder() {
        assert_eq!(format_count(None), "—");
    }

    #[test]
    fn count_groups_thousands() {
        assert_eq!(format_count(Some(0)), "0");
        assert_eq!(format_count(Some(527)), "527");
        assert_eq!(format_count(Some(1234)), "1,234");
        assert_eq!(format_count(Some(1_234_567)), "1,234,567");
    }

    #[test]
    fn month_day_drops_leading_zeros() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 6).unwrap();
        assert_eq!(format_month_day(date), "8/6");
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(format_month_day(date), "12/31");
    }

    #[test]
    fn grouping_preserves_sign_and_fraction() {
        assert_eq!(group_thousands("-1234.56"), "-1,234.56");
        assert_eq!(group_thousands("100"), "100");
        assert_eq!(group_thousands("1000"), "1,000");
    }

    #[test]
    fn formatting_is_idempotent_per_input() {
        assert_eq!(format_area(Some(12_345.6)), format_area(Some(12_345.6)));
        assert_eq!(format_count(Some(1_234_567)), format_count(Some(1_234_567)));
    }
}
