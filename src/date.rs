//! Civil-calendar dates for picking puzzle targets.
//!
//! The solver itself only consumes a [`TargetDate`] (month, day and
//! weekday indices). [`Date`] adds the real-calendar layer on top:
//! weekday computation, month lengths, `YYYY-MM-DD` keys for the solution
//! store and today's date. All arithmetic is proleptic Gregorian; `today`
//! uses UTC.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// The month, day and weekday whose cells stay open on the board.
///
/// `month_index` is 0-based (0 = Jan), `day` 1-based and `weekday_index`
/// 0-based starting Sunday. Any triple whose cells exist is a valid
/// puzzle target, including combinations no real calendar produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetDate {
    pub month_index: u8,
    pub day: u8,
    pub weekday_index: u8,
}

/// An invalid date or date string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateError {
    /// Month index outside 0-11.
    BadMonth(u8),
    /// Day outside the month's length.
    BadDay { month_index: u8, day: u8 },
    /// Not a `YYYY-MM-DD` string.
    BadFormat(String),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::BadMonth(month_index) => {
                write!(f, "month index {month_index} is out of range")
            }
            DateError::BadDay { month_index, day } => {
                write!(f, "day {day} does not exist in month index {month_index}")
            }
            DateError::BadFormat(text) => write!(f, "'{text}' is not a YYYY-MM-DD date"),
        }
    }
}

impl std::error::Error for DateError {}

/// True for Gregorian leap years.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Days in a month of the given year; month index 0-based, 0 for an
/// out-of-range month.
pub fn days_in_month(year: i32, month_index: u8) -> u8 {
    match month_index {
        0 | 2 | 4 | 6 | 7 | 9 | 11 => 31,
        3 | 5 | 8 | 10 => 30,
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// A validated calendar date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    year: i32,
    month_index: u8,
    day: u8,
}

impl Date {
    /// Creates a date, rejecting out-of-range months and days.
    pub fn new(year: i32, month_index: u8, day: u8) -> Result<Self, DateError> {
        if month_index > 11 {
            return Err(DateError::BadMonth(month_index));
        }
        if day == 0 || day > days_in_month(year, month_index) {
            return Err(DateError::BadDay { month_index, day });
        }
        Ok(Self {
            year,
            month_index,
            day,
        })
    }

    /// Today's date in UTC.
    pub fn today() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        from_epoch_days((seconds / 86_400) as i64)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 0-based month index (0 = Jan).
    pub fn month_index(&self) -> u8 {
        self.month_index
    }

    /// 1-based day of month.
    pub fn day(&self) -> u8 {
        self.day
    }

    /// Weekday index, 0 = Sunday.
    pub fn weekday_index(&self) -> u8 {
        // 1970-01-01 was a Thursday (index 4)
        ((self.epoch_days() + 4).rem_euclid(7)) as u8
    }

    /// The board target for this date.
    pub fn target(&self) -> TargetDate {
        TargetDate {
            month_index: self.month_index,
            day: self.day,
            weekday_index: self.weekday_index(),
        }
    }

    /// Storage key, `YYYY-MM-DD`.
    pub fn key(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.year,
            u32::from(self.month_index) + 1,
            self.day
        )
    }

    /// Days since 1970-01-01, negative before the epoch.
    fn epoch_days(&self) -> i64 {
        days_from_civil(self.year, self.month_index, self.day)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(DateError::BadFormat(s.to_string()));
        };
        let (Ok(year), Ok(month), Ok(day)) =
            (year.parse::<i32>(), month.parse::<u8>(), day.parse::<u8>())
        else {
            return Err(DateError::BadFormat(s.to_string()));
        };
        if month == 0 {
            return Err(DateError::BadFormat(s.to_string()));
        }
        if month > 12 {
            return Err(DateError::BadMonth(month - 1));
        }
        Date::new(year, month - 1, day)
    }
}

/// Days since 1970-01-01 for a civil date (month index 0-based).
///
/// Howard Hinnant's era/year-of-era decomposition, valid over the whole
/// i32 year range.
fn days_from_civil(year: i32, month_index: u8, day: u8) -> i64 {
    let month = i64::from(month_index) + 1;
    let day = i64::from(day);
    let year = i64::from(year) - i64::from(month <= 2);

    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let shifted_month = (month + 9) % 12;
    let day_of_year = (153 * shifted_month + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;

    era * 146_097 + day_of_era - 719_468
}

/// Inverse of [`days_from_civil`].
fn from_epoch_days(days: i64) -> Date {
    let shifted = days + 719_468;
    let era = shifted.div_euclid(146_097);
    let day_of_era = shifted - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1_460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let year = year_of_era + era * 400;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * shifted_month + 2) / 5 + 1) as u8;
    let month = if shifted_month < 10 {
        shifted_month + 3
    } else {
        shifted_month - 9
    };
    let year = if month <= 2 { year + 1 } else { year };

    Date {
        year: year as i32,
        month_index: (month - 1) as u8,
        day,
    }
}
