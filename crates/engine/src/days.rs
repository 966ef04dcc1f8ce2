//! Date arithmetic shared by the rules.

use chrono::{Duration, NaiveDate};

/// Days elapsed from `since` to `today` (negative when `since` is in the future).
pub(crate) fn days_between(since: NaiveDate, today: NaiveDate) -> i64 {
    (today - since).num_days()
}

/// `date` moved by `days`; `None` outside the representable calendar.
pub(crate) fn offset(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}
