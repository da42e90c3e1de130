use chrono::NaiveDate;
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;

lazy_static! {
    /// D(D)-M(M)-YYYY, the layout used by the santri spreadsheets
    static ref DAY_MONTH_YEAR: Regex = Regex::new(r"^(\d{1,2})-(\d{1,2})-(\d{4})$").unwrap();
}

/// Number of days in each month of a common year
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Determines whether `year` is a Gregorian leap year
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` (1-based) of `year`
///
/// # Returns
/// `None` if `month` is outside `1..=12`
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    let days = *DAYS_IN_MONTH.get(index)?;

    Some(if month == 2 && is_leap_year(year) {
        days + 1
    } else {
        days
    })
}

/// Parses a `DD-MM-YYYY` birth date, accepting single-digit day and month.
///
/// Malformed input and out-of-range values are logged and yield `None`; this
/// never fails the surrounding record.
///
/// # Arguments
/// * `input` - The raw date text, e.g. `"5-1-2023"`
///
/// # Returns
/// The parsed date, or `None` when the text is not a valid calendar date
pub fn parse_birth_date(input: &str) -> Option<NaiveDate> {
    let Some(captures) = DAY_MONTH_YEAR.captures(input) else {
        warn!("Invalid date format: {input}");
        return None;
    };

    let day: u32 = captures[1].parse().ok()?;
    let month: u32 = captures[2].parse().ok()?;
    let year: i32 = captures[3].parse().ok()?;

    let Some(max_day) = days_in_month(year, month) else {
        warn!("Invalid month ({month}) in date: {input}");
        return None;
    };

    if day < 1 || day > max_day {
        warn!("Invalid day ({day}) for month {month} of year {year}");
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Converts a `DD-MM-YYYY` date into canonical `YYYY-MM-DD` form
pub fn convert_date_format(input: &str) -> Option<String> {
    parse_birth_date(input).map(|date| date.format("%Y-%m-%d").to_string())
}
