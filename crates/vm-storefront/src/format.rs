//! Display formatting shared by the page renderers.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const CURRENCY: &str = "₽";

const GROUP_SEPARATOR: char = '\u{a0}';

/// `12 345 ₽`. Digits are grouped in threes only from five digits up, which
/// matches the ru-RU number format the storefront prices are shown in.
pub fn format_price(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + 8);
    if amount < 0 {
        out.push('-');
    }
    if digits.len() < 5 {
        out.push_str(&digits);
    } else {
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                out.push(GROUP_SEPARATOR);
            }
            out.push(ch);
        }
    }
    out.push(' ');
    out.push_str(CURRENCY);
    out
}

/// Long-form date (`5 March 2024`). Accepts RFC 3339, naive ISO datetimes and
/// bare dates; anything else is returned untouched.
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%-d %B %Y").to_string(),
        None => raw.to_owned(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// One decimal, as rating summaries show it.
pub fn format_rating(rating: f64) -> String {
    format!("{rating:.1}")
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `parseInt`-style leading integer: optional sign then digits, surrounding
/// garbage ignored. `None` when no digits lead the string.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_group_from_five_digits() {
        assert_eq!(format_price(0), "0 ₽");
        assert_eq!(format_price(9990), "9990 ₽");
        assert_eq!(format_price(89990), "89\u{a0}990 ₽");
        assert_eq!(format_price(1234567), "1\u{a0}234\u{a0}567 ₽");
        assert_eq!(format_price(-15000), "-15\u{a0}000 ₽");
    }

    #[test]
    fn dates_render_in_long_form() {
        assert_eq!(format_date("2024-03-05T10:15:00"), "5 March 2024");
        assert_eq!(format_date("2024-03-05T10:15:00.123456"), "5 March 2024");
        assert_eq!(format_date("2023-12-31T23:00:00+00:00"), "31 December 2023");
        assert_eq!(format_date("2024-01-09"), "9 January 2024");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn leading_int_mirrors_browser_parsing() {
        assert_eq!(parse_leading_int("  1500abc"), Some(1500));
        assert_eq!(parse_leading_int("-20"), Some(-20));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn ratings_keep_one_decimal() {
        assert_eq!(format_rating(4.0), "4.0");
        assert_eq!(format_rating(4.46), "4.5");
    }
}
