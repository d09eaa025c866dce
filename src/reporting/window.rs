//! Week windows for the weekly category reports.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime, UtcOffset};
use time_tz::{Offset, OffsetDateTimeExt, OffsetResult, PrimitiveDateTimeExt, TimeZone};

/// A half-open range of time `[start, end)` covering one Monday-based week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    /// Midnight at the start of the Monday, included in the window.
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    /// Midnight at the start of the following Monday, excluded from the window.
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

impl WeekWindow {
    /// Whether `instant` falls within the window.
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

fn monday_of(date: Date) -> Date {
    date - Duration::days(i64::from(date.weekday().number_days_from_monday()))
}

/// The week containing `now`, from Monday 00:00 UTC up to but excluding the
/// following Monday 00:00 UTC.
///
/// Sundays belong to the week that started six days earlier.
pub fn current_week_window(now: OffsetDateTime) -> WeekWindow {
    let start = monday_of(now.to_offset(UtcOffset::UTC).date())
        .midnight()
        .assume_utc();

    WeekWindow {
        start,
        end: start + Duration::days(7),
    }
}

/// The Monday-based week containing `now` on the calendar of `timezone`.
///
/// Both ends are local midnights, so a week that crosses a daylight saving
/// change is an hour shorter or longer than seven days.
pub fn week_window<T: TimeZone>(now: OffsetDateTime, timezone: &T) -> WeekWindow {
    let monday = monday_of(now.to_timezone(timezone).date());

    WeekWindow {
        start: local_midnight(monday, timezone),
        end: local_midnight(monday + Duration::days(7), timezone),
    }
}

/// The instant `date` starts in `timezone`.
///
/// An ambiguous midnight resolves to the earlier instant. Where a daylight
/// saving change skips midnight, the day starts at the end of the gap.
pub(crate) fn local_midnight<T: TimeZone>(date: Date, timezone: &T) -> OffsetDateTime {
    let midnight = date.midnight();

    match midnight.assume_timezone(timezone) {
        OffsetResult::Some(start) | OffsetResult::Ambiguous(start, _) => start,
        OffsetResult::None => {
            let day_before = (midnight - Duration::days(1)).assume_utc();
            let offset_before_gap = timezone.get_offset_utc(&day_before).to_utc();
            midnight
                .assume_offset(offset_before_gap)
                .to_timezone(timezone)
        }
    }
}
