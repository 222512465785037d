//! Timestamp text format shared by `EntryDate` and `CreationDate` columns.

use chrono::{Local, NaiveDateTime, SubsecRound};

/// `YYYY-MM-DD HH:MM:SS`, local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time truncated to whole seconds.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses stored timestamp text. Returns `None` for any other layout.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()
}
