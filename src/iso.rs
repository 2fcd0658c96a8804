//! This module implements the ISO date and date-time records that anchors
//! are built on.
//!
//! An `IsoDate` is the calendar independent representation of a day, and an
//! `IsoDateTime` adds a wall-clock time to it. Calendars and time zones map
//! their own notions of dates and instants into these records.

use crate::{
    components::duration::DateDuration,
    options::{ArithmeticOverflow, TemporalUnit},
    primitive::FiniteF64,
    utils, TemporalError, TemporalResult, NS_MAX_INSTANT, NS_MIN_INSTANT, NS_PER_DAY,
};

/// The maximum number of days from the epoch that a date may be.
const MAX_EPOCH_DAYS: i64 = 100_000_001;

// ==== `IsoDateTime` section ====

/// `IsoDateTime` is the record of the `IsoDate` and `IsoTime` internal slots.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IsoDateTime {
    pub date: IsoDate,
    pub time: IsoTime,
}

impl IsoDateTime {
    /// Creates a new `IsoDateTime` without any validation.
    pub(crate) const fn new_unchecked(date: IsoDate, time: IsoTime) -> Self {
        Self { date, time }
    }

    /// Creates the local `IsoDateTime` for an epoch nanosecond value with the provided
    /// offset applied.
    pub(crate) fn from_epoch_nanos(epoch_nanos: i128, offset: i128) -> TemporalResult<Self> {
        let local = epoch_nanos + offset;
        let ns_per_day = i128::from(NS_PER_DAY);
        let epoch_days = local.div_euclid(ns_per_day);
        let time_ns = local.rem_euclid(ns_per_day);

        let epoch_days = i64::try_from(epoch_days)
            .map_err(|_| TemporalError::range().with_message("Instant is outside valid limits."))?;
        let date = IsoDate::from_epoch_days(epoch_days)?;
        // NOTE: time_ns is always within a single day and therefore a valid i64.
        let time = IsoTime::from_nanoseconds_in_day(time_ns as i64);

        Ok(Self::new_unchecked(date, time))
    }

    /// Returns this `IsoDateTime` as nanoseconds from the epoch, treating the
    /// wall-clock value as if it were UTC.
    pub(crate) fn as_nanoseconds(&self) -> i128 {
        i128::from(self.date.to_epoch_days()) * i128::from(NS_PER_DAY)
            + i128::from(self.time.as_nanoseconds())
    }

    /// Returns whether the `IsoDateTime` is within the range of representable date-times.
    pub(crate) fn is_within_limits(&self) -> bool {
        let ns = self.as_nanoseconds();
        let max = NS_MAX_INSTANT + i128::from(NS_PER_DAY);
        let min = NS_MIN_INSTANT - i128::from(NS_PER_DAY);
        (min..=max).contains(&ns)
    }
}

// ==== `IsoDate` section ====

/// `IsoDate` serves as a record for the `[[ISOYear]]`, `[[ISOMonth]]`,
/// and `[[ISODay]]` internal fields.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl IsoDate {
    /// Creates a new `IsoDate` without determining the validity.
    pub(crate) const fn new_unchecked(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Creates a new `IsoDate`, rejecting invalid dates.
    pub fn new(year: i32, month: u8, day: u8) -> TemporalResult<Self> {
        Self::new_with_overflow(
            year,
            month.into(),
            day.into(),
            ArithmeticOverflow::Reject,
        )
    }

    /// `RegulateISODate`
    pub(crate) fn new_with_overflow(
        year: i32,
        month: i32,
        day: i32,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        let id = match overflow {
            ArithmeticOverflow::Constrain => {
                let month = month.clamp(1, 12);
                let day = day.clamp(1, utils::iso_days_in_month(year, month));
                // NOTE: Values are clamped in a u8 range.
                Self::new_unchecked(year, month as u8, day as u8)
            }
            ArithmeticOverflow::Reject => {
                if !is_valid_date(year, month, day) {
                    return Err(TemporalError::range().with_message("not a valid ISO date."));
                }
                // NOTE: Values have been verified to be in a u8 range.
                Self::new_unchecked(year, month as u8, day as u8)
            }
        };

        id.is_valid_day_range()?;
        Ok(id)
    }

    /// Creates an `IsoDate` from a count of days since the epoch.
    pub(crate) fn from_epoch_days(epoch_days: i64) -> TemporalResult<Self> {
        if epoch_days.abs() > MAX_EPOCH_DAYS {
            return Err(TemporalError::range().with_message("Not in a valid ISO day range."));
        }
        let (year, month, day) = utils::epoch_days_to_iso_date(epoch_days);
        Ok(Self::new_unchecked(year, month, day))
    }

    pub(crate) fn is_valid_day_range(&self) -> TemporalResult<()> {
        if self.to_epoch_days().abs() > MAX_EPOCH_DAYS {
            return Err(TemporalError::range().with_message("Not in a valid ISO day range."));
        }
        Ok(())
    }

    /// Functionally the same as Date's abstract operation `MakeDay`
    ///
    /// Equivalent to `IsoDateToEpochDays`
    #[inline]
    pub(crate) fn to_epoch_days(self) -> i64 {
        utils::iso_date_to_epoch_days(self.year, self.month.into(), self.day.into())
    }

    /// Returns the resulting `IsoDate` from adding a provided `DateDuration` to this `IsoDate`
    ///
    /// Equivalent to `AddISODate`.
    pub(crate) fn add_date_duration(
        self,
        duration: &DateDuration,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        // 1. Assert: year, month, day, years, months, weeks, and days are integers.
        // 2. Assert: overflow is either "constrain" or "reject".
        let years = FiniteF64::try_from(duration.years)?.as_date_value()?;
        let months = FiniteF64::try_from(duration.months)?.as_date_value()?;
        // 3. Let intermediate be ! BalanceISOYearMonth(year + years, month + months).
        let intermediate = utils::balance_iso_year_month(
            self.year
                .checked_add(years)
                .ok_or(TemporalError::range().with_message("Year exceeds a valid range."))?,
            i32::from(self.month)
                .checked_add(months)
                .ok_or(TemporalError::range().with_message("Month exceeds a valid range."))?,
        );

        // 4. Let intermediate be ? RegulateISODate(intermediate.[[Year]], intermediate.[[Month]], day, overflow).
        let intermediate = Self::new_with_overflow(
            intermediate.0,
            intermediate.1,
            i32::from(self.day),
            overflow,
        )?;

        // 5. Set days to days + 7 × weeks.
        let additional_days = duration.weeks.mul_add(7.0, duration.days);
        if !additional_days.is_finite() || additional_days.abs() > (MAX_EPOCH_DAYS * 2) as f64 {
            return Err(TemporalError::range().with_message("Days exceed a valid range."));
        }

        // 6. Let d be intermediate.[[Day]] + days.
        // 7. Return BalanceISODate(intermediate.[[Year]], intermediate.[[Month]], d).
        Self::from_epoch_days(intermediate.to_epoch_days() + additional_days as i64)
    }

    /// `DifferenceISODate`
    pub(crate) fn diff_iso_date(
        &self,
        other: &Self,
        largest_unit: TemporalUnit,
    ) -> TemporalResult<DateDuration> {
        // 1. Assert: IsValidISODate(y1, m1, d1) is true.
        // 2. Assert: IsValidISODate(y2, m2, d2) is true.
        // 3. Let sign be -CompareISODate(y1, m1, d1, y2, m2, d2).
        let sign = -(self.cmp(other) as i8);
        // 4. If sign = 0, return ! CreateDateDurationRecord(0, 0, 0, 0).
        if sign == 0 {
            return Ok(DateDuration::default());
        };

        // 5. Let years be 0.
        let mut years = 0;
        let mut months = 0;
        // 6. If largestUnit is "year" or "month", then
        if largest_unit == TemporalUnit::Year || largest_unit == TemporalUnit::Month {
            // NOTE: Starting at the difference in years saves iterations.
            // a. Let candidateYears be sign.
            let mut candidate_years: i32 = other.year - self.year;
            if candidate_years != 0 {
                candidate_years -= i32::from(sign);
            }
            // b. Repeat, while ISODateSurpasses(sign, y1 + candidateYears, m1, d1, y2, m2, d2) is false,
            while !iso_date_surpasses(
                &IsoDate::new_unchecked(self.year + candidate_years, self.month, self.day),
                other,
                sign,
            ) {
                // i. Set years to candidateYears.
                years = candidate_years;
                // ii. Set candidateYears to candidateYears + sign.
                candidate_years += i32::from(sign);
            }

            // 7. Let months be 0.
            // 8. If largestUnit is "year" or largestUnit is "month", then
            // a. Let candidateMonths be sign.
            let mut candidate_months: i32 = sign.into();
            // b. Let intermediate be BalanceISOYearMonth(y1 + years, m1 + candidateMonths).
            let mut intermediate = utils::balance_iso_year_month(
                self.year + years,
                i32::from(self.month) + candidate_months,
            );
            // c. Repeat, while ISODateSurpasses(sign, intermediate.[[Year]], intermediate.[[Month]], d1, y2, m2, d2) is false,
            // NOTE: balance_iso_year_month always returns a month value from 1..=12
            while !iso_date_surpasses(
                &IsoDate::new_unchecked(intermediate.0, intermediate.1 as u8, self.day),
                other,
                sign,
            ) {
                // i. Set months to candidateMonths.
                months = candidate_months;
                // ii. Set candidateMonths to candidateMonths + sign.
                candidate_months += i32::from(sign);
                // iii. Set intermediate to BalanceISOYearMonth(intermediate.[[Year]], intermediate.[[Month]] + sign).
                intermediate =
                    utils::balance_iso_year_month(intermediate.0, intermediate.1 + i32::from(sign));
            }

            if largest_unit == TemporalUnit::Month {
                months += years * 12;
                years = 0;
            }
        }

        // 9. Set intermediate to BalanceISOYearMonth(y1 + years, m1 + months).
        let intermediate =
            utils::balance_iso_year_month(self.year + years, i32::from(self.month) + months);
        // 10. Let constrained be ! RegulateISODate(intermediate.[[Year]], intermediate.[[Month]], d1, "constrain").
        let constrained = Self::new_with_overflow(
            intermediate.0,
            intermediate.1,
            self.day.into(),
            ArithmeticOverflow::Constrain,
        )?;

        // 11. Let days be the difference in epoch days, split into weeks if requested.
        let days = other.to_epoch_days() - constrained.to_epoch_days();

        let (weeks, days) = if largest_unit == TemporalUnit::Week {
            (days / 7, days % 7)
        } else {
            (0, days)
        };

        // 12. Return ! CreateDateDurationRecord(years, months, weeks, days).
        DateDuration::new(
            f64::from(years),
            f64::from(months),
            weeks as f64,
            days as f64,
        )
    }
}

// ==== `IsoTime` section ====

/// An `IsoTime` record that contains `Temporal`'s
/// time slots.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
    pub microsecond: u16,
    pub nanosecond: u16,
}

impl IsoTime {
    /// Creates a new `IsoTime` without any validaiton.
    pub(crate) const fn new_unchecked(
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
    ) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond,
            microsecond,
            nanosecond,
        }
    }

    /// Creates a new regulated `IsoTime`, rejecting out of range values.
    pub fn new(
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
    ) -> TemporalResult<Self> {
        let time = Self::new_unchecked(hour, minute, second, millisecond, microsecond, nanosecond);
        if !time.is_valid() {
            return Err(TemporalError::range().with_message("IsoTime is not valid"));
        }
        Ok(time)
    }

    /// Creates an `IsoTime` from a nanosecond offset into a day.
    ///
    /// NOTE: `nanoseconds` must be in the range of `0..NS_PER_DAY`.
    pub(crate) fn from_nanoseconds_in_day(nanoseconds: i64) -> Self {
        let (hour, rem) = div_mod(nanoseconds, 3_600_000_000_000);
        let (minute, rem) = div_mod(rem, 60_000_000_000);
        let (second, rem) = div_mod(rem, 1_000_000_000);
        let (millisecond, rem) = div_mod(rem, 1_000_000);
        let (microsecond, nanosecond) = div_mod(rem, 1_000);

        Self::new_unchecked(
            hour as u8,
            minute as u8,
            second as u8,
            millisecond as u16,
            microsecond as u16,
            nanosecond as u16,
        )
    }

    /// Returns the nanoseconds elapsed since the start of the day.
    pub(crate) fn as_nanoseconds(&self) -> i64 {
        i64::from(self.hour) * 3_600_000_000_000
            + i64::from(self.minute) * 60_000_000_000
            + i64::from(self.second) * 1_000_000_000
            + i64::from(self.millisecond) * 1_000_000
            + i64::from(self.microsecond) * 1_000
            + i64::from(self.nanosecond)
    }

    /// Checks if the time is a valid `IsoTime`
    pub(crate) fn is_valid(&self) -> bool {
        self.hour <= 23
            && self.minute <= 59
            && self.second <= 59
            && self.millisecond <= 999
            && self.microsecond <= 999
            && self.nanosecond <= 999
    }
}

// ==== `IsoDate` specific utiltiy functions ====

#[inline]
// Determines if the month and day are valid for the given year.
fn is_valid_date(year: i32, month: i32, day: i32) -> bool {
    if !(1..=12).contains(&month) {
        return false;
    }
    (1..=utils::iso_days_in_month(year, month)).contains(&day)
}

#[inline]
/// Returns with the `this` surpasses `other`.
fn iso_date_surpasses(this: &IsoDate, other: &IsoDate, sign: i8) -> bool {
    this.cmp(other) as i8 * sign == 1
}

#[inline]
fn div_mod(dividend: i64, divisor: i64) -> (i64, i64) {
    (dividend.div_euclid(divisor), dividend.rem_euclid(divisor))
}
