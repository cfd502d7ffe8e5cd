use crate::utils::time;
use rust_i18n::t;
use serde::{Deserialize, Serialize};

pub use crate::utils::time::TimeField;

/// Markers used by categorical day flags to mean "closed"
const CLOSED_MARKERS: [&str; 2] = ["closed", "휴무"];

/// Weekly operating hours exactly as persisted and exchanged with clients
///
/// Every time bound is loosely typed (number or string, sentinel text for
/// "no data"); the Sunday and holiday flags are categorical text and the
/// shared lunch window is a single "HHMM~HHMM" string. Nothing here is
/// validated; [`ScheduleDoc::normalize`] is the only way past this boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleDoc {
    pub mon_start: Option<TimeField>,
    pub mon_end: Option<TimeField>,
    pub tue_start: Option<TimeField>,
    pub tue_end: Option<TimeField>,
    pub wed_start: Option<TimeField>,
    pub wed_end: Option<TimeField>,
    pub thu_start: Option<TimeField>,
    pub thu_end: Option<TimeField>,
    pub fri_start: Option<TimeField>,
    pub fri_end: Option<TimeField>,
    pub sat_start: Option<TimeField>,
    pub sat_end: Option<TimeField>,
    /// Categorical Sunday flag; a closed marker means closed, anything else is no signal
    pub no_sunday: Option<String>,
    /// Categorical holiday flag, carried and displayed but never evaluated
    pub no_holiday: Option<String>,
    /// Shared weekday lunch window, "HHMM~HHMM"
    pub lunch: Option<String>,
}

impl ScheduleDoc {
    /// The six weekday (start, end) field pairs, Monday first
    pub fn day_pairs(&self) -> [(&Option<TimeField>, &Option<TimeField>); 6] {
        [
            (&self.mon_start, &self.mon_end),
            (&self.tue_start, &self.tue_end),
            (&self.wed_start, &self.wed_end),
            (&self.thu_start, &self.thu_end),
            (&self.fri_start, &self.fri_end),
            (&self.sat_start, &self.sat_end),
        ]
    }

    /// Normalize the loose document into the canonical weekly schedule
    pub fn normalize(&self) -> WeeklySchedule {
        let weekdays = self.day_pairs().map(|(start, end)| {
            let open = time::normalize_time(start.as_ref())?;
            let close = time::normalize_time(end.as_ref())?;
            Some(DaySlot { open, close })
        });

        WeeklySchedule {
            weekdays,
            sunday: if is_closed_marker(&self.no_sunday) {
                SundayRule::Closed
            } else {
                SundayRule::OpenUnspecified
            },
            holiday: if is_closed_marker(&self.no_holiday) {
                HolidayRule::ClosedMarked
            } else {
                HolidayRule::Unspecified
            },
            lunch_break: self
                .lunch
                .as_deref()
                .and_then(time::parse_break)
                .map(|(start, end)| BreakWindow { start, end }),
        }
    }

    /// Render the document for display, one line per day plus the extras
    pub fn formatted(&self) -> FormattedHours {
        let [monday, tuesday, wednesday, thursday, friday, saturday] =
            self.day_pairs().map(|(start, end)| {
                time::format_range(
                    time::normalize_time(start.as_ref()),
                    time::normalize_time(end.as_ref()),
                )
            });
        let flag = |value: &Option<String>| {
            if is_closed_marker(value) {
                t!("hours_closed").to_string()
            } else {
                t!("hours_no_data").to_string()
            }
        };

        FormattedHours {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday: flag(&self.no_sunday),
            holiday: flag(&self.no_holiday),
            lunch: match self.lunch.as_deref().and_then(time::parse_break) {
                Some((start, end)) => time::format_range(Some(start), Some(end)),
                None => t!("hours_no_data").to_string(),
            },
        }
    }
}

fn is_closed_marker(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|v| CLOSED_MARKERS.contains(&v.trim()))
        .unwrap_or(false)
}

/// Open/close bounds for one weekday, in raw minutes of day
///
/// Bounds are carried as normalized but unchecked values; status derivation
/// treats anything outside `[0, 1440)` as unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySlot {
    pub open: u32,
    pub close: u32,
}

/// Shared weekday lunch window, in raw minutes of day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakWindow {
    pub start: u32,
    pub end: u32,
}

/// Sunday carries only a categorical flag, never a time range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SundayRule {
    Closed,
    OpenUnspecified,
}

/// Public-holiday flag, a passthrough the status derivation ignores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayRule {
    ClosedMarked,
    Unspecified,
}

/// Canonical weekly schedule produced by [`ScheduleDoc::normalize`]
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySchedule {
    /// Monday through Saturday
    pub weekdays: [Option<DaySlot>; 6],
    pub sunday: SundayRule,
    pub holiday: HolidayRule,
    pub lunch_break: Option<BreakWindow>,
}

/// Current standing of a facility relative to its schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenStatus {
    Open,
    OnBreak,
    ClosedToday,
    ClosedSunday,
    Unknown,
}

impl OpenStatus {
    /// Localized badge text shown next to the hours
    pub fn label(&self) -> String {
        match self {
            OpenStatus::Open => t!("status_open"),
            OpenStatus::OnBreak => t!("status_on_break"),
            OpenStatus::ClosedToday => t!("status_closed_today"),
            OpenStatus::ClosedSunday => t!("status_closed_sunday"),
            OpenStatus::Unknown => t!("status_unknown"),
        }
        .to_string()
    }
}

/// Human-readable rendering of a schedule document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedHours {
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
    pub holiday: String,
    pub lunch: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weekday_doc() -> ScheduleDoc {
        ScheduleDoc {
            mon_start: Some(TimeField::Num(900)),
            mon_end: Some(TimeField::Text("1800".to_string())),
            tue_start: Some(TimeField::Text("-".to_string())),
            tue_end: Some(TimeField::Num(1800)),
            no_sunday: Some("휴무".to_string()),
            lunch: Some("1200~1300".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_untagged_time_fields_decode() {
        let doc: ScheduleDoc =
            serde_json::from_str(r#"{"monStart": 900, "monEnd": "1800"}"#).unwrap();
        assert_eq!(doc.mon_start, Some(TimeField::Num(900)));
        assert_eq!(doc.mon_end, Some(TimeField::Text("1800".to_string())));
        // Everything not mentioned defaults to absent
        assert_eq!(doc.tue_start, None);
        assert_eq!(doc.lunch, None);
    }

    #[test]
    fn test_normalize_builds_slots() {
        let schedule = weekday_doc().normalize();
        assert_eq!(
            schedule.weekdays[0],
            Some(DaySlot {
                open: 540,
                close: 1080
            })
        );
        // A sentinel bound drops the whole day
        assert_eq!(schedule.weekdays[1], None);
        assert_eq!(schedule.weekdays[2], None);
        assert_eq!(schedule.sunday, SundayRule::Closed);
        assert_eq!(schedule.holiday, HolidayRule::Unspecified);
        assert_eq!(
            schedule.lunch_break,
            Some(BreakWindow {
                start: 720,
                end: 780
            })
        );
    }

    #[test]
    fn test_sunday_and_holiday_markers() {
        let doc = ScheduleDoc {
            no_sunday: Some("진료".to_string()),
            no_holiday: Some("closed".to_string()),
            ..Default::default()
        };
        let schedule = doc.normalize();
        assert_eq!(schedule.sunday, SundayRule::OpenUnspecified);
        assert_eq!(schedule.holiday, HolidayRule::ClosedMarked);
    }

    #[test]
    fn test_malformed_lunch_produces_no_window() {
        let doc = ScheduleDoc {
            lunch: Some("1200~".to_string()),
            ..Default::default()
        };
        assert_eq!(doc.normalize().lunch_break, None);
    }

    #[test]
    fn test_formatted_lines() {
        let formatted = weekday_doc().formatted();
        assert_eq!(formatted.monday, "09:00 ~ 18:00");
        // Half-missing day renders the placeholder on the missing side
        assert_eq!(formatted.tuesday, "no data ~ 18:00");
        assert_eq!(formatted.wednesday, "no data");
        assert_eq!(formatted.sunday, "closed");
        assert_eq!(formatted.holiday, "no data");
        assert_eq!(formatted.lunch, "12:00 ~ 13:00");
    }

    #[test]
    fn test_doc_round_trips_through_json() {
        let doc = weekday_doc();
        let json = serde_json::to_string(&doc).unwrap();
        let back: ScheduleDoc = serde_json::from_str(&json).unwrap();
        assert_eq!(doc, back);
    }
}
