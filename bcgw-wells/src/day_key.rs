use chrono::{Datelike, NaiveDate};

/// Year every calendar day is normalized onto. A leap year, so that
/// 29 February has a key of its own.
pub const DUMMY_YEAR: i32 = 2000;

/// A calendar day (month and day) with the year normalized away.
///
/// Historical daily statistics are published per day of year; observations
/// from any year are joined to them through this key.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Create a key from a month and day, `None` if the day does not exist.
    pub fn from_md_opt(month: u32, day: u32) -> Option<DayKey> {
        NaiveDate::from_ymd_opt(DUMMY_YEAR, month, day).map(DayKey)
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// The key as a date in the dummy year.
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(value: NaiveDate) -> Self {
        // every (month, day) exists in the leap dummy year
        DayKey(value.with_year(DUMMY_YEAR).unwrap_or(value))
    }
}
