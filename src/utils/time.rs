use rust_i18n::t;
use serde::{Deserialize, Serialize};

/// Markers used by legacy directory records to mean "no data"
const NO_DATA_MARKERS: [&str; 3] = ["-", "no data", "정보 없음"];

/// A time field as it appears on the wire: a compact number like `930`,
/// a compact string like `"1730"`, or sentinel text meaning "no data"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeField {
    Num(i64),
    Text(String),
}

/// Check whether a string is one of the legacy "no data" sentinels
pub fn is_no_data(value: &str) -> bool {
    NO_DATA_MARKERS.contains(&value.trim())
}

/// Normalize a wire time value to a minute-of-day
///
/// Sentinel or absent values yield `None`. Everything else is stringified,
/// zero-padded to four digits and read as hour/minute pairs, so `930` and
/// `"0930"` both become `570`. Out-of-range results such as `2575` are passed
/// through; callers decide how to treat values outside `[0, 1440)`.
pub fn normalize_time(value: Option<&TimeField>) -> Option<u32> {
    match value? {
        TimeField::Num(n) => compact_minutes(&n.to_string()),
        TimeField::Text(s) => {
            if is_no_data(s) {
                None
            } else {
                compact_minutes(s)
            }
        }
    }
}

/// Render a minute-of-day as "HH:MM", or the localized placeholder for `None`
pub fn format_minute(minute: Option<u32>) -> String {
    match minute {
        Some(m) => format!("{:02}:{:02}", m / 60, m % 60),
        None => t!("hours_no_data").to_string(),
    }
}

/// Render an open/close pair as "HH:MM ~ HH:MM"
///
/// A fully missing pair renders as the placeholder alone; a half-missing
/// pair shows the placeholder on the missing side only.
pub fn format_range(open: Option<u32>, close: Option<u32>) -> String {
    match (open, close) {
        (None, None) => t!("hours_no_data").to_string(),
        _ => format!("{} ~ {}", format_minute(open), format_minute(close)),
    }
}

/// Parse a "HHMM~HHMM" break window; both halves must normalize
pub fn parse_break(raw: &str) -> Option<(u32, u32)> {
    let mut parts = raw.split('~');
    let start = compact_minutes(non_empty(parts.next()?)?)?;
    let end = compact_minutes(non_empty(parts.next()?)?)?;
    Some((start, end))
}

fn non_empty(part: &str) -> Option<&str> {
    let trimmed = part.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Core compaction rule shared by every accepted representation
///
/// Accepts both the compact form ("930", "1730") and the display form
/// ("09:30"); colons are stripped before padding. Slicing is by characters,
/// never bytes, so arbitrary legacy text degrades to `None` instead of
/// panicking.
fn compact_minutes(raw: &str) -> Option<u32> {
    if is_no_data(raw) {
        return None;
    }
    let digits: String = raw.chars().filter(|c| *c != ':').collect();
    let padded = if digits.chars().count() < 4 {
        format!("{:0>4}", digits)
    } else {
        digits
    };
    let hour: u32 = padded.chars().take(2).collect::<String>().parse().ok()?;
    let minute: u32 = padded
        .chars()
        .skip(2)
        .take(2)
        .collect::<String>()
        .parse()
        .ok()?;
    Some(hour * 60 + minute)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_time() {
        // Compact numbers and strings
        assert_eq!(normalize_time(Some(&TimeField::Num(930))), Some(570));
        assert_eq!(normalize_time(Some(&TimeField::Num(1730))), Some(1050));
        assert_eq!(
            normalize_time(Some(&TimeField::Text("0930".to_string()))),
            Some(570)
        );
        assert_eq!(
            normalize_time(Some(&TimeField::Text("930".to_string()))),
            Some(570)
        );
        assert_eq!(normalize_time(Some(&TimeField::Num(0))), Some(0)); // "0000" = midnight
        assert_eq!(normalize_time(Some(&TimeField::Num(90))), Some(90)); // hour 00, minute 90

        // Sentinels and absence
        assert_eq!(normalize_time(None), None);
        assert_eq!(normalize_time(Some(&TimeField::Text("-".to_string()))), None);
        assert_eq!(
            normalize_time(Some(&TimeField::Text("정보 없음".to_string()))),
            None
        );
        assert_eq!(
            normalize_time(Some(&TimeField::Text("no data".to_string()))),
            None
        );

        // Malformed input degrades, never panics
        assert_eq!(normalize_time(Some(&TimeField::Text("abc".to_string()))), None);
        assert_eq!(normalize_time(Some(&TimeField::Num(-30))), None);
        assert_eq!(
            normalize_time(Some(&TimeField::Text("변동".to_string()))),
            None
        );

        // Out-of-range values pass through uninterpreted
        assert_eq!(normalize_time(Some(&TimeField::Num(2575))), Some(1575)); // 25*60+75
        assert_eq!(
            normalize_time(Some(&TimeField::Text("3099".to_string()))),
            Some(1899)
        );
    }

    #[test]
    fn test_format_minute() {
        assert_eq!(format_minute(Some(0)), "00:00");
        assert_eq!(format_minute(Some(570)), "09:30");
        assert_eq!(format_minute(Some(1079)), "17:59");
        assert_eq!(format_minute(Some(1439)), "23:59");
        // Placeholder for missing data (default locale)
        assert_eq!(format_minute(None), "no data");
    }

    #[test]
    fn test_normalize_format_round_trip() {
        for m in 0..1440 {
            let rendered = format_minute(Some(m));
            let field = TimeField::Text(rendered);
            assert_eq!(normalize_time(Some(&field)), Some(m));
        }
        // The placeholder round-trips back to "no data"
        let placeholder = TimeField::Text(format_minute(None));
        assert_eq!(normalize_time(Some(&placeholder)), None);
    }

    #[test]
    fn test_format_range() {
        assert_eq!(format_range(Some(540), Some(1080)), "09:00 ~ 18:00");
        assert_eq!(format_range(None, Some(1080)), "no data ~ 18:00");
        assert_eq!(format_range(Some(540), None), "09:00 ~ no data");
        assert_eq!(format_range(None, None), "no data");
    }

    #[test]
    fn test_parse_break() {
        assert_eq!(parse_break("1200~1300"), Some((720, 780)));
        assert_eq!(parse_break("1130~1400"), Some((690, 840)));
        assert_eq!(parse_break(" 1200 ~ 1300 "), Some((720, 780)));

        // One-sided or malformed windows produce no window at all
        assert_eq!(parse_break("1200~"), None);
        assert_eq!(parse_break("~1300"), None);
        assert_eq!(parse_break("1200"), None);
        assert_eq!(parse_break("정보 없음"), None);
        assert_eq!(parse_break("점심시간~유동적"), None);
    }
}
