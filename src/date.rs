//! Calendar-aware dates.
//!
//! A [`Date`] is a year/month/day triple in one of two calendar systems,
//! always valid for that system. Internally it carries the equivalent
//! Gregorian day so that comparisons work across systems.

use chrono::{Datelike, Duration as ChronoDuration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSystem {
    #[default]
    Gregorian,
    /// Solar Hijri (Jalali) calendar.
    Persian,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("month {0} is out of range")]
    MonthOutOfRange(u32),
    #[error("day {day} is out of range for {year}-{month:02}")]
    DayOutOfRange { year: i32, month: u32, day: u32 },
    #[error("year {0} is outside the supported range")]
    YearOutOfRange(i32),
    #[error("invalid date `{0}` (expected YYYY-MM-DD)")]
    Unparsable(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "DateRepr", into = "DateRepr")]
pub struct Date {
    system: CalendarSystem,
    year: i32,
    month: u32,
    day: u32,
    gregorian: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct DateRepr {
    year: i32,
    month: u32,
    day: u32,
    #[serde(default, skip_serializing_if = "is_gregorian")]
    calendar: CalendarSystem,
}

fn is_gregorian(system: &CalendarSystem) -> bool {
    *system == CalendarSystem::Gregorian
}

impl TryFrom<DateRepr> for Date {
    type Error = DateError;

    fn try_from(repr: DateRepr) -> Result<Self, Self::Error> {
        Date::new(repr.calendar, repr.year, repr.month, repr.day)
    }
}

impl From<Date> for DateRepr {
    fn from(date: Date) -> Self {
        DateRepr {
            year: date.year,
            month: date.month,
            day: date.day,
            calendar: date.system,
        }
    }
}

impl Date {
    pub fn new(system: CalendarSystem, year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        let last = days_in_month(system, year, month)?;
        if day == 0 || day > last {
            return Err(DateError::DayOutOfRange { year, month, day });
        }
        let gregorian = match system {
            CalendarSystem::Gregorian => NaiveDate::from_ymd_opt(year, month, day)
                .ok_or(DateError::DayOutOfRange { year, month, day })?,
            CalendarSystem::Persian => jalali::to_gregorian(year, month, day)?,
        };
        Ok(Date {
            system,
            year,
            month,
            day,
            gregorian,
        })
    }

    pub fn from_gregorian(system: CalendarSystem, date: NaiveDate) -> Result<Self, DateError> {
        let (year, month, day) = match system {
            CalendarSystem::Gregorian => (date.year(), date.month(), date.day()),
            CalendarSystem::Persian => jalali::from_gregorian(date)?,
        };
        Ok(Date {
            system,
            year,
            month,
            day,
            gregorian: date,
        })
    }

    pub fn today(system: CalendarSystem) -> Result<Self, DateError> {
        Self::from_gregorian(system, Local::now().date_naive())
    }

    /// Parses `YYYY-MM-DD` as a date of `system`.
    pub fn parse(system: CalendarSystem, input: &str) -> Result<Self, DateError> {
        let raw = input.trim();
        let mut parts = raw.splitn(3, '-');
        let mut next = || parts.next().map(str::trim);
        let (year, month, day) = match (next(), next(), next()) {
            (Some(y), Some(m), Some(d)) => (y, m, d),
            _ => return Err(DateError::Unparsable(raw.to_string())),
        };
        let unparsable = |_| DateError::Unparsable(raw.to_string());
        Date::new(
            system,
            year.parse().map_err(unparsable)?,
            month.parse().map_err(unparsable)?,
            day.parse().map_err(unparsable)?,
        )
    }

    pub fn system(&self) -> CalendarSystem {
        self.system
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn gregorian(&self) -> NaiveDate {
        self.gregorian
    }

    /// Weekday counted from Sunday (0) to Saturday (6).
    pub fn weekday_from_sunday(&self) -> u32 {
        self.gregorian.weekday().num_days_from_sunday()
    }

    pub fn with_system(&self, system: CalendarSystem) -> Result<Self, DateError> {
        if system == self.system {
            return Ok(*self);
        }
        Self::from_gregorian(system, self.gregorian)
    }

    pub fn with_day(&self, day: u32) -> Result<Self, DateError> {
        Self::new(self.system, self.year, self.month, day)
    }

    pub fn add_days(&self, days: i64) -> Result<Self, DateError> {
        let shifted = self
            .gregorian
            .checked_add_signed(ChronoDuration::days(days))
            .ok_or(DateError::YearOutOfRange(self.year))?;
        Self::from_gregorian(self.system, shifted)
    }

    /// Moves by whole months, clamping the day to the target month's length.
    pub fn add_months(&self, months: i64) -> Result<Self, DateError> {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 + months;
        let year = i32::try_from(index.div_euclid(12)).map_err(|_| DateError::YearOutOfRange(self.year))?;
        let month = index.rem_euclid(12) as u32 + 1;
        let day = self.day.min(days_in_month(self.system, year, month)?);
        Self::new(self.system, year, month, day)
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(&self, other: &Date) -> i64 {
        (other.gregorian - self.gregorian).num_days()
    }

    /// Signed number of calendar months from `self` to `other`, counted in
    /// `self`'s calendar system.
    pub fn months_until(&self, other: &Date) -> i64 {
        let start = i64::from(self.year) * 12 + i64::from(self.month);
        let end = i64::from(other.year) * 12 + i64::from(other.month);
        end - start
    }
}

impl PartialEq for Date {
    fn eq(&self, other: &Self) -> bool {
        self.gregorian == other.gregorian
    }
}

impl Eq for Date {}

impl Hash for Date {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.gregorian.hash(state);
    }
}

impl PartialOrd for Date {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Date {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gregorian.cmp(&other.gregorian)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

pub fn is_leap_year(system: CalendarSystem, year: i32) -> Result<bool, DateError> {
    match system {
        CalendarSystem::Gregorian => {
            Ok((year % 4 == 0 && year % 100 != 0) || year % 400 == 0)
        }
        CalendarSystem::Persian => jalali::is_leap(year),
    }
}

pub fn days_in_month(system: CalendarSystem, year: i32, month: u32) -> Result<u32, DateError> {
    if !(1..=12).contains(&month) {
        return Err(DateError::MonthOutOfRange(month));
    }
    let leap = is_leap_year(system, year)?;
    let days = match system {
        CalendarSystem::Gregorian => match month {
            2 if leap => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        },
        CalendarSystem::Persian => match month {
            1..=6 => 31,
            7..=11 => 30,
            _ if leap => 30,
            _ => 29,
        },
    };
    Ok(days)
}

/// Jalali arithmetic based on the 33-year break table.
mod jalali {
    use super::DateError;
    use chrono::{Datelike, Duration as ChronoDuration, NaiveDate};

    const BREAKS: [i32; 20] = [
        -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262,
        2324, 2394, 2456, 3178,
    ];

    struct YearInfo {
        /// Years since the last leap year; 0 means this year is leap.
        leap: i32,
        gregorian_year: i32,
        /// Day of March on which Farvardin 1 falls.
        march: u32,
    }

    fn year_info(jy: i32) -> Result<YearInfo, DateError> {
        let last = BREAKS[BREAKS.len() - 1];
        if jy < BREAKS[0] || jy >= last {
            return Err(DateError::YearOutOfRange(jy));
        }
        let gy = jy + 621;
        let mut leap_j = -14;
        let mut jp = BREAKS[0];
        let mut jump = 0;
        for &jm in &BREAKS[1..] {
            jump = jm - jp;
            if jy < jm {
                break;
            }
            leap_j += jump / 33 * 8 + (jump % 33) / 4;
            jp = jm;
        }
        let mut n = jy - jp;
        leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
        if jump % 33 == 4 && jump - n == 4 {
            leap_j += 1;
        }
        let leap_g = gy / 4 - (gy / 100 + 1) * 3 / 4 - 150;
        let march = 20 + leap_j - leap_g;
        if jump - n < 6 {
            n = n - jump + (jump + 4) / 33 * 33;
        }
        let mut leap = ((n + 1) % 33 - 1) % 4;
        if leap == -1 {
            leap = 4;
        }
        Ok(YearInfo {
            leap,
            gregorian_year: gy,
            march: march as u32,
        })
    }

    pub(super) fn is_leap(jy: i32) -> Result<bool, DateError> {
        Ok(year_info(jy)?.leap == 0)
    }

    fn new_year(info: &YearInfo, jy: i32) -> Result<NaiveDate, DateError> {
        NaiveDate::from_ymd_opt(info.gregorian_year, 3, info.march)
            .ok_or(DateError::YearOutOfRange(jy))
    }

    pub(super) fn to_gregorian(jy: i32, jm: u32, jd: u32) -> Result<NaiveDate, DateError> {
        let info = year_info(jy)?;
        let start = new_year(&info, jy)?;
        let jm = i64::from(jm);
        let offset = (jm - 1) * 31 - jm / 7 * (jm - 7) + i64::from(jd) - 1;
        Ok(start + ChronoDuration::days(offset))
    }

    pub(super) fn from_gregorian(date: NaiveDate) -> Result<(i32, u32, u32), DateError> {
        let mut jy = date.year() - 621;
        let info = year_info(jy)?;
        let start = new_year(&info, jy)?;
        let mut k = (date - start).num_days();
        if k >= 0 {
            if k <= 185 {
                return Ok((jy, (1 + k / 31) as u32, (k % 31 + 1) as u32));
            }
            k -= 186;
        } else {
            jy -= 1;
            k += 179;
            if info.leap == 1 {
                k += 1;
            }
        }
        Ok((jy, (7 + k / 30) as u32, (k % 30 + 1) as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gregorian(y: i32, m: u32, d: u32) -> Date {
        Date::new(CalendarSystem::Gregorian, y, m, d).expect("valid date")
    }

    #[test]
    fn rejects_invalid_days() {
        assert!(Date::new(CalendarSystem::Gregorian, 2023, 2, 29).is_err());
        assert!(Date::new(CalendarSystem::Gregorian, 2024, 2, 29).is_ok());
        assert!(Date::new(CalendarSystem::Gregorian, 2024, 13, 1).is_err());
        assert!(Date::new(CalendarSystem::Gregorian, 2024, 4, 0).is_err());
    }

    #[test]
    fn persian_new_year_matches_known_dates() {
        let nowruz = Date::new(CalendarSystem::Persian, 1403, 1, 1).unwrap();
        assert_eq!(nowruz.gregorian(), NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        let next = Date::new(CalendarSystem::Persian, 1404, 1, 1).unwrap();
        assert_eq!(next.gregorian(), NaiveDate::from_ymd_opt(2025, 3, 21).unwrap());
    }

    #[test]
    fn persian_leap_years_have_thirty_days_in_esfand() {
        assert_eq!(days_in_month(CalendarSystem::Persian, 1403, 12).unwrap(), 30);
        assert_eq!(days_in_month(CalendarSystem::Persian, 1402, 12).unwrap(), 29);
        let last = Date::from_gregorian(
            CalendarSystem::Persian,
            NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
        )
        .unwrap();
        assert_eq!((last.year(), last.month(), last.day()), (1403, 12, 30));
    }

    #[test]
    fn conversion_round_trips_through_second_half_of_year() {
        let mehr = Date::new(CalendarSystem::Persian, 1403, 7, 1).unwrap();
        let back = Date::from_gregorian(CalendarSystem::Persian, mehr.gregorian()).unwrap();
        assert_eq!((back.month(), back.day()), (7, 1));
        assert_eq!(mehr.gregorian(), NaiveDate::from_ymd_opt(2024, 9, 22).unwrap());
    }

    #[test]
    fn equality_ignores_calendar_system() {
        let g = gregorian(2024, 3, 20);
        let p = g.with_system(CalendarSystem::Persian).unwrap();
        assert_eq!(g, p);
        assert_eq!(p.to_string(), "1403-01-01");
    }

    #[test]
    fn add_months_clamps_day() {
        let jan31 = gregorian(2024, 1, 31);
        assert_eq!(jan31.add_months(1).unwrap(), gregorian(2024, 2, 29));
        assert_eq!(jan31.add_months(-2).unwrap(), gregorian(2023, 11, 30));
    }

    #[test]
    fn parse_accepts_iso_dates() {
        let date = Date::parse(CalendarSystem::Gregorian, " 2024-02-29 ").unwrap();
        assert_eq!(date, gregorian(2024, 2, 29));
        assert!(matches!(
            Date::parse(CalendarSystem::Gregorian, "tomorrow"),
            Err(DateError::Unparsable(_))
        ));
    }

    #[test]
    fn serde_round_trip_keeps_system() {
        let date = Date::new(CalendarSystem::Persian, 1402, 12, 29).unwrap();
        let yaml = serde_yaml::to_string(&date).unwrap();
        assert!(yaml.contains("calendar: persian"));
        let back: Date = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.system(), CalendarSystem::Persian);
        assert_eq!(back, date);
        assert!(serde_yaml::from_str::<Date>("year: 2023\nmonth: 2\nday: 29\n").is_err());
    }
}
