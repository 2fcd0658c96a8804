//! Utility date and time equations for Temporal

// ==== Begin Date Equations ====

const DAYS_IN_ERA: i64 = 146_097;
const DAYS_FROM_0000_01_01_TO_1970_01_01: i64 = 719_468;

/// Returns whether `year` is a leap year in the proleptic Gregorian calendar.
#[inline]
pub(crate) const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// `ISODaysInMonth ( year, month )`
///
/// NOTE: `month` is expected to be in a range of 1-12; any other value is treated as
/// a 31 day month.
pub(crate) const fn iso_days_in_month(year: i32, month: i32) -> i32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Returns the number of days since the Unix epoch for an ISO date.
///
/// `month` must be in a range of 1-12, while `day` may overflow the month, in which
/// case the result is the epoch day that many days past the first of the month.
pub(crate) fn iso_date_to_epoch_days(year: i32, month: i32, day: i32) -> i64 {
    // ref: http://howardhinnant.github.io/date_algorithms.html
    let year = i64::from(year) - i64::from(month <= 2);
    let month = i64::from(month);
    let month = if month > 2 { month - 3 } else { month + 9 };

    let era = year.div_euclid(400);
    let year_of_era = year.rem_euclid(400);
    let day_of_year = (153 * month + 2) / 5 + i64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * DAYS_IN_ERA + day_of_era - DAYS_FROM_0000_01_01_TO_1970_01_01
}

/// Returns the ISO `(year, month, day)` for a count of days since the Unix epoch.
pub(crate) fn epoch_days_to_iso_date(epoch_days: i64) -> (i32, u8, u8) {
    // ref: http://howardhinnant.github.io/date_algorithms.html
    let days = epoch_days + DAYS_FROM_0000_01_01_TO_1970_01_01;
    let era = days.div_euclid(DAYS_IN_ERA);
    let day_of_era = days.rem_euclid(DAYS_IN_ERA);
    let year_of_era =
        (day_of_era - day_of_era / 1_460 + day_of_era / 36_524 - day_of_era / (DAYS_IN_ERA - 1))
            / 365;
    let year = year_of_era + era * 400;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let month = (day_of_year * 5 + 2) / 153;
    let day = day_of_year - (153 * month + 2) / 5 + 1;
    let month = if month < 10 { month + 3 } else { month - 9 };
    let year = if month <= 2 { year + 1 } else { year };

    // NOTE: month and day are always in a u8 range; year is bounded by the epoch day limits.
    (year as i32, month as u8, day as u8)
}

/// `BalanceISOYearMonth ( year, month )`
#[inline]
pub(crate) fn balance_iso_year_month(year: i32, month: i32) -> (i32, i32) {
    // 1. Assert: year and month are integers.
    // 2. Set year to year + floor((month - 1) / 12).
    let y = year + (month - 1).div_euclid(12);
    // 3. Set month to ((month - 1) modulo 12) + 1.
    let m = (month - 1).rem_euclid(12) + 1;
    // 4. Return the Record { [[Year]]: year, [[Month]]: month  }.
    (y, m)
}

// ==== End Date Equations ====
