use super::models::{OpenStatus, SundayRule, WeeklySchedule};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

/// Upper bound of the valid minute-of-day domain
pub(crate) const MINUTES_PER_DAY: u32 = 1440;

/// Derive the open/closed status of a facility at a given local time
///
/// Total and pure: ambiguous or malformed stored data degrades to
/// `Unknown` instead of erroring, since a directory page must always
/// render something. The caller supplies the timestamp; no clock is read
/// here.
pub fn derive_status(schedule: &WeeklySchedule, at: NaiveDateTime) -> OpenStatus {
    let now_minute = at.hour() * 60 + at.minute();

    if at.weekday() == Weekday::Sun {
        return match schedule.sunday {
            SundayRule::Closed => OpenStatus::ClosedSunday,
            // Sunday has no positive "open" signal; absence of the closed
            // flag means unknown, not open.
            SundayRule::OpenUnspecified => OpenStatus::Unknown,
        };
    }

    // Sunday returned above, so this index is always 0..=5
    let day_index = at.weekday().num_days_from_monday() as usize;
    let slot = match schedule.weekdays[day_index] {
        Some(slot) if in_range(slot.open) && in_range(slot.close) => slot,
        _ => return OpenStatus::Unknown,
    };

    // Half-open interval: a time exactly equal to `close` is already closed
    if now_minute < slot.open || now_minute >= slot.close {
        return OpenStatus::ClosedToday;
    }

    if let Some(window) = schedule.lunch_break {
        if window.start <= now_minute && now_minute < window.end {
            return OpenStatus::OnBreak;
        }
    }

    OpenStatus::Open
}

fn in_range(minute: u32) -> bool {
    minute < MINUTES_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::hours::models::{BreakWindow, DaySlot, HolidayRule};
    use chrono::NaiveDate;

    fn bare_schedule() -> WeeklySchedule {
        WeeklySchedule {
            weekdays: [None; 6],
            sunday: SundayRule::OpenUnspecified,
            holiday: HolidayRule::Unspecified,
            lunch_break: None,
        }
    }

    fn monday_schedule(open: u32, close: u32) -> WeeklySchedule {
        let mut schedule = bare_schedule();
        schedule.weekdays[0] = Some(DaySlot { open, close });
        schedule
    }

    // Monday, 2025-03-03
    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 3)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    // Sunday, 2025-03-09
    fn sunday_at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 9)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_boundary_exactness() {
        let schedule = monday_schedule(540, 1080); // 09:00 - 18:00

        assert_eq!(
            derive_status(&schedule, monday_at(8, 59)),
            OpenStatus::ClosedToday
        );
        assert_eq!(derive_status(&schedule, monday_at(9, 0)), OpenStatus::Open);
        assert_eq!(derive_status(&schedule, monday_at(17, 59)), OpenStatus::Open);
        assert_eq!(
            derive_status(&schedule, monday_at(18, 0)),
            OpenStatus::ClosedToday
        );
    }

    #[test]
    fn test_break_precedence() {
        let mut schedule = monday_schedule(540, 1080);
        schedule.lunch_break = Some(BreakWindow {
            start: 720,
            end: 780,
        }); // 12:00 - 13:00

        assert_eq!(derive_status(&schedule, monday_at(11, 59)), OpenStatus::Open);
        assert_eq!(
            derive_status(&schedule, monday_at(12, 0)),
            OpenStatus::OnBreak
        );
        assert_eq!(
            derive_status(&schedule, monday_at(12, 59)),
            OpenStatus::OnBreak
        );
        assert_eq!(derive_status(&schedule, monday_at(13, 0)), OpenStatus::Open);
    }

    #[test]
    fn test_closed_wins_over_break() {
        // Window spilling past closing time never resurrects the day
        let mut schedule = monday_schedule(540, 1080);
        schedule.lunch_break = Some(BreakWindow {
            start: 1050,
            end: 1100,
        });

        assert_eq!(
            derive_status(&schedule, monday_at(17, 35)),
            OpenStatus::OnBreak
        );
        assert_eq!(
            derive_status(&schedule, monday_at(18, 5)),
            OpenStatus::ClosedToday
        );
    }

    #[test]
    fn test_sunday_duality() {
        let mut closed = monday_schedule(540, 1080);
        closed.sunday = SundayRule::Closed;

        // The closed flag wins at any time of day
        assert_eq!(
            derive_status(&closed, sunday_at(0, 0)),
            OpenStatus::ClosedSunday
        );
        assert_eq!(
            derive_status(&closed, sunday_at(12, 0)),
            OpenStatus::ClosedSunday
        );
        assert_eq!(
            derive_status(&closed, sunday_at(23, 59)),
            OpenStatus::ClosedSunday
        );

        // Without the flag there is no signal at all, and never Open
        let unspecified = monday_schedule(540, 1080);
        assert_eq!(
            derive_status(&unspecified, sunday_at(10, 0)),
            OpenStatus::Unknown
        );
    }

    #[test]
    fn test_missing_day_is_unknown() {
        let schedule = monday_schedule(540, 1080);
        // Tuesday, 2025-03-04 has no slot
        let tuesday = NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(derive_status(&schedule, tuesday), OpenStatus::Unknown);
    }

    #[test]
    fn test_out_of_range_bounds_are_unknown() {
        // 25:75 slipped through normalization untouched
        assert_eq!(
            derive_status(&monday_schedule(540, 1575), monday_at(10, 0)),
            OpenStatus::Unknown
        );
        assert_eq!(
            derive_status(&monday_schedule(1500, 1600), monday_at(10, 0)),
            OpenStatus::Unknown
        );
        // 1440 itself is outside the valid domain
        assert_eq!(
            derive_status(&monday_schedule(540, 1440), monday_at(10, 0)),
            OpenStatus::Unknown
        );
    }

    #[test]
    fn test_inverted_slot_reads_as_closed() {
        let schedule = monday_schedule(1000, 500);
        assert_eq!(
            derive_status(&schedule, monday_at(7, 0)),
            OpenStatus::ClosedToday
        );
        assert_eq!(
            derive_status(&schedule, monday_at(11, 0)),
            OpenStatus::ClosedToday
        );
    }

    #[test]
    fn test_saturday_slot() {
        let mut schedule = bare_schedule();
        schedule.weekdays[5] = Some(DaySlot {
            open: 600,
            close: 840,
        });
        // Saturday, 2025-03-08
        let saturday = NaiveDate::from_ymd_opt(2025, 3, 8)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap();
        assert_eq!(derive_status(&schedule, saturday), OpenStatus::Open);
    }

    #[test]
    fn test_empty_schedule_is_unknown_all_week() {
        let schedule = bare_schedule();
        assert_eq!(derive_status(&schedule, monday_at(10, 0)), OpenStatus::Unknown);
        assert_eq!(derive_status(&schedule, sunday_at(10, 0)), OpenStatus::Unknown);
    }
}
