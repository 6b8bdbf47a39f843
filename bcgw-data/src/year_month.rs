use bcgw_utils::dates::{month_index, MID_MONTH_DAY};
use chrono::{Datelike, Months, NaiveDate};
use std::mem::replace;

/// A calendar month, represented by its mid-month date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<YearMonth> {
        NaiveDate::from_ymd_opt(year, month, MID_MONTH_DAY).map(YearMonth)
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> YearMonth {
        // every month has a 15th
        YearMonth(date.with_day(MID_MONTH_DAY).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// The 15th of the month, used to place the month on a time axis.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Whole months from `self` to `other` (negative if `other` is earlier).
    pub fn months_until(&self, other: &YearMonth) -> i32 {
        month_index(other.year(), other.month()) - month_index(self.year(), self.month())
    }

    pub fn succ(&self) -> Option<YearMonth> {
        self.0.checked_add_months(Months::new(1)).map(YearMonth)
    }
}

/// An iterator over calendar months, inclusive on both ends.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct MonthRange(pub Option<YearMonth>, pub YearMonth);

impl MonthRange {
    pub fn new(first: YearMonth, last: YearMonth) -> MonthRange {
        MonthRange(Some(first), last)
    }
}

impl Iterator for MonthRange {
    type Item = YearMonth;
    fn next(&mut self) -> Option<Self::Item> {
        match self.0 {
            Some(current) if current <= self.1 => {
                let next = current.succ();
                replace(&mut self.0, next)
            }
            _ => None,
        }
    }
}
