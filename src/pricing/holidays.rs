//! Belgian public holiday calendar.
//!
//! Fixed-date holidays plus the Easter-derived movable feasts. Easter is
//! computed with the anonymous Gregorian (Butcher) algorithm, valid for
//! all Gregorian years.

use chrono::{Datelike, Duration, NaiveDate};

/// Fixed-date public holidays as (month, day).
const FIXED_HOLIDAYS: [(u32, u32); 7] = [
    (1, 1),   // New Year's Day
    (5, 1),   // Labour Day
    (7, 21),  // Belgian National Day
    (8, 15),  // Assumption
    (11, 1),  // All Saints' Day
    (11, 11), // Armistice Day
    (12, 25), // Christmas Day
];

/// Easter Sunday for a Gregorian year (Butcher's algorithm).
pub fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    // The algorithm only yields valid March or April dates.
    NaiveDate::from_ymd_opt(year, month as u32, day as u32).expect("computus yields a valid date")
}

/// Whether the date is a Belgian public holiday.
pub fn is_public_holiday(date: NaiveDate) -> bool {
    if FIXED_HOLIDAYS.contains(&(date.month(), date.day())) {
        return true;
    }

    let easter = easter_sunday(date.year());
    let movable = [
        easter + Duration::days(1),  // Easter Monday
        easter + Duration::days(39), // Ascension Day
        easter + Duration::days(50), // Whit Monday
    ];
    movable.contains(&date)
}
