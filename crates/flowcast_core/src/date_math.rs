//! Calendar arithmetic helpers for period generation.
//!
//! Day differences use Rata Die day-numbering so that slicing a twenty-year
//! accrual window into biweekly periods never goes through `jiff::Span`
//! normalisation. Month offsets are computed directly on year/month pairs and
//! clamp the day-of-month the same way `jiff` does for `n.months()`.

use jiff::civil::Date;

#[inline]
pub fn is_leap_year(year: i16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Length of a month, for clamping payment days.
#[inline]
pub fn days_in_month(year: i16, month: i8) -> i8 {
    const DAYS: [i8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[(month - 1) as usize]
    }
}

#[inline]
pub fn days_in_year(year: i16) -> i32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Day number of a civil date, 0001-01-01 being day 1 (Baum 2017).
#[inline]
fn rata_die(d: Date) -> i32 {
    let (month, day) = (d.month() as i32, d.day() as i32);
    // Years run March to February so the leap day is the last day of a year
    let january_or_february = (14 - month) / 12;
    let year = d.year() as i32 - january_or_february;
    let march_based_month = month + 12 * january_or_february - 3;

    day + (153 * march_based_month + 2) / 5 + 365 * year + year / 4 - year / 100 + year / 400 - 306
}

#[inline]
fn from_rata_die(rd: i32) -> Date {
    // Day 0 is March 1 of year 0
    let z = rd + 306;
    let h = 100 * z - 25;
    let a = h / 3_652_425;
    let b = a - a / 4;
    let y = (100 * b + h) / 36_525;
    let c = b + z - 365 * y - y / 4;
    let m = (5 * c + 456) / 153;
    let day = c - (153 * m - 457) / 5;

    let (year, month) = if m > 12 { (y + 1, m - 12) } else { (y, m) };

    jiff::civil::date(year as i16, month as i8, day as i8)
}

/// Signed day count from `from` to `to`.
#[inline]
pub fn fast_days_between(from: Date, to: Date) -> i32 {
    rata_die(to) - rata_die(from)
}

/// Number of days in `[start, end]`, counting both ends.
#[inline]
pub fn inclusive_days(start: Date, end: Date) -> i32 {
    fast_days_between(start, end) + 1
}

#[inline]
pub fn add_days(d: Date, n: i32) -> Date {
    from_rata_die(rata_die(d) + n)
}

/// Add `n` calendar months, clamping the day to the length of the target month.
pub fn add_months(d: Date, n: i32) -> Date {
    let index = d.year() as i32 * 12 + (d.month() as i32 - 1) + n;
    let year = index.div_euclid(12) as i16;
    let month = (index.rem_euclid(12) + 1) as i8;
    let day = d.day().min(days_in_month(year, month));
    jiff::civil::date(year, month, day)
}

/// Calendar-month difference between the months containing `from` and `to`.
#[inline]
pub fn months_between(from: Date, to: Date) -> i32 {
    (to.year() as i32 - from.year() as i32) * 12 + (to.month() as i32 - from.month() as i32)
}

/// The same year and month as `d` with the day replaced, clamped to the month length.
#[inline]
pub fn with_day_clamped(d: Date, day: i8) -> Date {
    let day = day.clamp(1, days_in_month(d.year(), d.month()));
    jiff::civil::date(d.year(), d.month(), day)
}

#[inline]
pub fn first_of_month(d: Date) -> Date {
    jiff::civil::date(d.year(), d.month(), 1)
}

#[inline]
pub fn last_of_month(d: Date) -> Date {
    jiff::civil::date(d.year(), d.month(), days_in_month(d.year(), d.month()))
}

#[inline]
pub fn year_start(year: i16) -> Date {
    jiff::civil::date(year, 1, 1)
}

#[inline]
pub fn year_end(year: i16) -> Date {
    jiff::civil::date(year, 12, 31)
}
