//! Implementation of a `DateDuration`

use crate::{
    components::{calendar::CalendarProtocol, PlainDate},
    options::{ArithmeticOverflow, TemporalUnit},
    primitive::FiniteF64,
    Sign, TemporalError, TemporalResult,
};

use super::{duration_sign, is_integral_duration, is_valid_duration};

/// `DateDuration` represents the [date duration record][spec] of the `Duration.`
///
/// These fields are laid out in the [Temporal Proposal][field spec] as 64-bit floating point numbers.
///
/// [spec]: https://tc39.es/proposal-temporal/#sec-temporal-date-duration-records
/// [field spec]: https://tc39.es/proposal-temporal/#sec-properties-of-temporal-duration-instances
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DateDuration {
    /// `DateDuration`'s internal year value.
    pub years: f64,
    /// `DateDuration`'s internal month value.
    pub months: f64,
    /// `DateDuration`'s internal week value.
    pub weeks: f64,
    /// `DateDuration`'s internal day value.
    pub days: f64,
}

impl DateDuration {
    /// Creates a new, non-validated `DateDuration`.
    #[inline]
    #[must_use]
    pub(crate) const fn new_unchecked(years: f64, months: f64, weeks: f64, days: f64) -> Self {
        Self {
            years,
            months,
            weeks,
            days,
        }
    }

    /// `UnbalanceDurationRelative`
    ///
    /// Folds the units coarser than `largest_unit` into the next finer unit:
    /// years into months for `month`, years and months into days for `week`,
    /// and years, months, and weeks into days for `day` and finer.
    pub(crate) fn unbalance_relative<C: CalendarProtocol>(
        &self,
        largest_unit: TemporalUnit,
        plain_relative_to: Option<&PlainDate<C>>,
    ) -> TemporalResult<Self> {
        // 1. If largestUnit is "year", or years, months, weeks, and days are all 0, then
        if largest_unit == TemporalUnit::Year || self.is_zero() {
            // a. Return ! CreateDateDurationRecord(years, months, weeks, days).
            return Ok(*self);
        }

        // The loops below step one whole unit at a time.
        if !(self.years.fract() == 0.0 && self.months.fract() == 0.0 && self.weeks.fract() == 0.0)
        {
            return Err(TemporalError::range()
                .with_message("Calendar units must be integral to be unbalanced."));
        }

        let (mut years, mut months, mut weeks, mut days) =
            (self.years, self.months, self.weeks, self.days);

        // 2. Let sign be ! DurationSign(years, months, weeks, days, 0, 0, 0, 0, 0, 0).
        let sign = f64::from(self.sign() as i8);

        // 3. Let oneYear, oneMonth, and oneWeek be durations of one unit with the sign of sign.
        let one_year = Self::new_unchecked(sign, 0.0, 0.0, 0.0);
        let one_month = Self::new_unchecked(0.0, sign, 0.0, 0.0);
        let one_week = Self::new_unchecked(0.0, 0.0, sign, 0.0);

        // 4-5. Determine the units that must be resolved against relativeTo.
        let needs_anchor = match largest_unit {
            TemporalUnit::Month => years != 0.0,
            TemporalUnit::Week => years != 0.0 || months != 0.0,
            _ => years != 0.0 || months != 0.0 || weeks != 0.0,
        };
        if !needs_anchor {
            return Ok(*self);
        }

        // 6. If relativeTo is undefined, then
        let Some(mut relative_to) = plain_relative_to.cloned() else {
            // a. Throw a RangeError exception.
            return Err(TemporalError::range()
                .with_message("Calendar units cannot be unbalanced without relativeTo."));
        };

        // 7. If largestUnit is "month", then
        if largest_unit == TemporalUnit::Month {
            // a. Repeat, while years ≠ 0,
            while years != 0.0 {
                // i. Let newRelativeTo be ? CalendarDateAdd(calendar, relativeTo, oneYear, undefined, dateAdd).
                let new_relative_to =
                    relative_to.add_date(&one_year, ArithmeticOverflow::Constrain)?;
                // ii-iv. Let oneYearMonths be untilResult.[[Months]].
                let one_year_months = relative_to
                    .until_date(&new_relative_to, TemporalUnit::Month)?
                    .months;
                // v. Set relativeTo to newRelativeTo.
                relative_to = new_relative_to;
                // vi. Set years to years - sign.
                years -= sign;
                // vii. Set months to months + oneYearMonths.
                months += one_year_months;
            }
            // b. Return ? CreateDateDurationRecord(0, months, weeks, days).
            return Self::new(years, months, weeks, days);
        }

        // 8. Repeat, while years ≠ 0,
        while years != 0.0 {
            // a. Let moveResult be ? MoveRelativeDate(calendar, relativeTo, oneYear).
            let (new_relative_to, one_year_days) = relative_to.move_relative_date(&one_year)?;
            // b. Set relativeTo to moveResult.[[RelativeTo]].
            relative_to = new_relative_to;
            // c. Set days to days + moveResult.[[Days]].
            days += one_year_days;
            // d. Set years to years - sign.
            years -= sign;
        }

        // 9. Repeat, while months ≠ 0,
        while months != 0.0 {
            let (new_relative_to, one_month_days) = relative_to.move_relative_date(&one_month)?;
            relative_to = new_relative_to;
            days += one_month_days;
            months -= sign;
        }

        // 10. If largestUnit is not "week", repeat, while weeks ≠ 0,
        if largest_unit != TemporalUnit::Week {
            while weeks != 0.0 {
                let (new_relative_to, one_week_days) =
                    relative_to.move_relative_date(&one_week)?;
                relative_to = new_relative_to;
                days += one_week_days;
                weeks -= sign;
            }
        }

        // 11. Return ? CreateDateDurationRecord(years, months, weeks, days).
        Self::new(years, months, weeks, days)
    }

    /// `BalanceDurationRelative`
    ///
    /// Redistributes the days of this duration into weeks, months, and years up to
    /// `largest_unit`, measuring each unit at the current anchor position.
    pub(crate) fn balance_relative<C: CalendarProtocol>(
        &self,
        largest_unit: TemporalUnit,
        plain_relative_to: Option<&PlainDate<C>>,
    ) -> TemporalResult<Self> {
        // 1. If largestUnit is not one of "year", "month", or "week", or years, months, weeks, and days are all 0, then
        if !largest_unit.is_calendar_unit() || self.is_zero() {
            // a. Return ! CreateDateDurationRecord(years, months, weeks, days).
            return Ok(*self);
        }

        // 2. If relativeTo is undefined, then
        let Some(mut relative_to) = plain_relative_to.cloned() else {
            // a. Throw a RangeError exception.
            return Err(TemporalError::range()
                .with_message("Days cannot be balanced into calendar units without relativeTo."));
        };

        // 3. Let sign be ! DurationSign(years, months, weeks, days, 0, 0, 0, 0, 0, 0).
        // 4. Assert: sign ≠ 0.
        let sign = f64::from(self.sign() as i8);

        // 5. Let oneYear, oneMonth, and oneWeek be durations of one unit with the sign of sign.
        let one_year = Self::new_unchecked(sign, 0.0, 0.0, 0.0);
        let one_month = Self::new_unchecked(0.0, sign, 0.0, 0.0);
        let one_week = Self::new_unchecked(0.0, 0.0, sign, 0.0);

        let (mut years, mut months, mut weeks, mut days) =
            (self.years, self.months, self.weeks, self.days);

        match largest_unit {
            // 9. If largestUnit is "year", then
            TemporalUnit::Year => {
                // a. Let moveResult be ? MoveRelativeDate(calendar, relativeTo, oneYear).
                // b. Let newRelativeTo be moveResult.[[RelativeTo]].
                // c. Let oneYearDays be moveResult.[[Days]].
                let (mut new_relative_to, mut one_year_days) =
                    relative_to.move_relative_date(&one_year)?;

                // d. Repeat, while abs(days) ≥ abs(oneYearDays),
                while days.abs() >= one_year_days.abs() {
                    // i. Set days to days - oneYearDays.
                    days -= one_year_days;
                    // ii. Set years to years + sign.
                    years += sign;
                    // iii. Set relativeTo to newRelativeTo.
                    relative_to = new_relative_to;
                    // iv-vi. Set moveResult to ? MoveRelativeDate(calendar, relativeTo, oneYear).
                    (new_relative_to, one_year_days) = relative_to.move_relative_date(&one_year)?;
                }

                // e. Set moveResult to ? MoveRelativeDate(calendar, relativeTo, oneMonth).
                let (mut new_relative_to, mut one_month_days) =
                    relative_to.move_relative_date(&one_month)?;

                // h. Repeat, while abs(days) ≥ abs(oneMonthDays),
                while days.abs() >= one_month_days.abs() {
                    days -= one_month_days;
                    months += sign;
                    relative_to = new_relative_to;
                    (new_relative_to, one_month_days) =
                        relative_to.move_relative_date(&one_month)?;
                }

                // i. Set newRelativeTo to ? CalendarDateAdd(calendar, relativeTo, oneYear, undefined, dateAdd).
                let mut new_relative_to = relative_to.add_date(&one_year, ArithmeticOverflow::Constrain)?;
                // j-n. Let oneYearMonths be untilResult.[[Months]].
                let mut one_year_months = relative_to
                    .until_date(&new_relative_to, TemporalUnit::Month)?
                    .months;

                // o. Repeat, while abs(months) ≥ abs(oneYearMonths),
                while months.abs() >= one_year_months.abs() {
                    // i. Set months to months - oneYearMonths.
                    months -= one_year_months;
                    // ii. Set years to years + sign.
                    years += sign;
                    // iii. Set relativeTo to newRelativeTo.
                    relative_to = new_relative_to;
                    // iv. Set newRelativeTo to ? CalendarDateAdd(calendar, relativeTo, oneYear, undefined, dateAdd).
                    new_relative_to = relative_to.add_date(&one_year, ArithmeticOverflow::Constrain)?;
                    // v-vii. Set oneYearMonths to untilResult.[[Months]].
                    one_year_months = relative_to
                        .until_date(&new_relative_to, TemporalUnit::Month)?
                        .months;
                }
            }
            // 10. Else if largestUnit is "month", then
            TemporalUnit::Month => {
                // a. Let moveResult be ? MoveRelativeDate(calendar, relativeTo, oneMonth).
                let (mut new_relative_to, mut one_month_days) =
                    relative_to.move_relative_date(&one_month)?;

                // d. Repeat, while abs(days) ≥ abs(oneMonthDays),
                while days.abs() >= one_month_days.abs() {
                    days -= one_month_days;
                    months += sign;
                    relative_to = new_relative_to;
                    (new_relative_to, one_month_days) =
                        relative_to.move_relative_date(&one_month)?;
                }
            }
            // 11. Else,
            TemporalUnit::Week => {
                // a. Assert: largestUnit is "week".
                // b. Let moveResult be ? MoveRelativeDate(calendar, relativeTo, oneWeek).
                let (mut new_relative_to, mut one_week_days) =
                    relative_to.move_relative_date(&one_week)?;

                // e. Repeat, while abs(days) ≥ abs(oneWeekDays),
                while days.abs() >= one_week_days.abs() {
                    days -= one_week_days;
                    weeks += sign;
                    relative_to = new_relative_to;
                    (new_relative_to, one_week_days) = relative_to.move_relative_date(&one_week)?;
                }
            }
            _ => return Err(TemporalError::assert()),
        }

        // 12. Return ? CreateDateDurationRecord(years, months, weeks, days).
        Self::new(years, months, weeks, days)
    }
}

impl DateDuration {
    /// Creates a new `DateDuration` with provided values.
    pub fn new(years: f64, months: f64, weeks: f64, days: f64) -> TemporalResult<Self> {
        let result = Self::new_unchecked(years, months, weeks, days);
        if !is_valid_duration(&result.fields()) {
            return Err(TemporalError::range().with_message("Invalid DateDuration."));
        }
        if !is_integral_duration(&result.fields()) {
            return Err(TemporalError::range().with_message("DateDuration fields must be integers."));
        }
        Ok(result)
    }

    /// Returns a negated `DateDuration`.
    #[inline]
    #[must_use]
    pub fn negated(&self) -> Self {
        let negate = |v: f64| FiniteF64(v).negate().as_inner();
        Self {
            years: negate(self.years),
            months: negate(self.months),
            weeks: negate(self.weeks),
            days: negate(self.days),
        }
    }

    /// Returns a new `DateDuration` representing the absolute value of the current.
    #[inline]
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            years: self.years.abs(),
            months: self.months.abs(),
            weeks: self.weeks.abs(),
            days: self.days.abs(),
        }
    }

    /// Returns the sign for the current `DateDuration`.
    #[inline]
    #[must_use]
    pub fn sign(&self) -> Sign {
        duration_sign(&self.fields())
    }

    /// Returns whether every field is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.fields().iter().all(|v| *v == 0.0)
    }

    /// Returns the `[f64; 4]` array of the `DateDuration` fields.
    #[inline]
    #[must_use]
    pub fn fields(&self) -> [f64; 4] {
        [self.years, self.months, self.weeks, self.days]
    }
}

#[cfg(test)]
mod tests {
    use super::DateDuration;
    use crate::{
        components::{calendar::IsoCalendar, PlainDate},
        options::TemporalUnit,
        ErrorKind,
    };

    #[test]
    fn unbalance_steps_years_then_months_then_weeks() {
        let anchor = PlainDate::new(2020, 1, 1, IsoCalendar).unwrap();
        let duration = DateDuration::new(1.0, 1.0, 1.0, 1.0).unwrap();
        let result = duration
            .unbalance_relative(TemporalUnit::Day, Some(&anchor))
            .unwrap();
        // 2020 is a leap year and January 2021 has 31 days.
        assert_eq!(result, DateDuration::new(0.0, 0.0, 0.0, 366.0 + 31.0 + 7.0 + 1.0).unwrap());

        let negative = duration.negated();
        let result = negative
            .unbalance_relative(TemporalUnit::Day, Some(&anchor))
            .unwrap();
        // 2019 is not a leap year and December 2018 has 31 days.
        assert_eq!(result.days, -(365.0 + 31.0 + 7.0 + 1.0));
    }

    #[test]
    fn unbalance_requires_anchor_for_calendar_units() {
        let duration = DateDuration::new(0.0, 2.0, 0.0, 0.0).unwrap();
        let err = duration
            .unbalance_relative::<IsoCalendar>(TemporalUnit::Day, None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);

        // Months need no anchor when months are the largest unit.
        let same = duration
            .unbalance_relative::<IsoCalendar>(TemporalUnit::Month, None)
            .unwrap();
        assert_eq!(same, duration);

        // Pure days never need an anchor.
        let days = DateDuration::new(0.0, 0.0, 0.0, 40.0).unwrap();
        assert_eq!(
            days.unbalance_relative::<IsoCalendar>(TemporalUnit::Hour, None)
                .unwrap(),
            days
        );
    }

    #[test]
    fn unbalance_folds_only_coarser_units() {
        let anchor = PlainDate::new(2020, 1, 1, IsoCalendar).unwrap();

        let duration = DateDuration::new(1.0, 2.0, 0.0, 3.0).unwrap();
        let result = duration
            .unbalance_relative(TemporalUnit::Month, Some(&anchor))
            .unwrap();
        assert_eq!(result, DateDuration::new(0.0, 14.0, 0.0, 3.0).unwrap());

        // Weeks are kept for a week largest unit; January 2020 has 31 days.
        let duration = DateDuration::new(0.0, 1.0, 1.0, 0.0).unwrap();
        let result = duration
            .unbalance_relative(TemporalUnit::Week, Some(&anchor))
            .unwrap();
        assert_eq!(result, DateDuration::new(0.0, 0.0, 1.0, 31.0).unwrap());

        let err = DateDuration::new(1.0, 0.0, 0.0, 0.0)
            .unwrap()
            .unbalance_relative::<IsoCalendar>(TemporalUnit::Week, None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn unbalance_rejects_fractional_calendar_units() {
        let anchor = PlainDate::new(2020, 1, 1, IsoCalendar).unwrap();
        for unit in [TemporalUnit::Month, TemporalUnit::Week, TemporalUnit::Day] {
            let err = DateDuration::new_unchecked(1.5, 0.0, 0.0, 0.0)
                .unbalance_relative(unit, Some(&anchor))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range);
        }
        let err = DateDuration::new_unchecked(0.0, 0.5, 0.0, 0.0)
            .unbalance_relative(TemporalUnit::Day, Some(&anchor))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);

        let err = DateDuration::new(0.0, 0.0, 2.5, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn balance_days_into_years_and_months() {
        let anchor = PlainDate::new(2019, 1, 1, IsoCalendar).unwrap();
        // 365 days of 2019, 31 days of January 2020 and 10 more days.
        let duration = DateDuration::new(0.0, 0.0, 0.0, 406.0).unwrap();
        let result = duration
            .balance_relative(TemporalUnit::Year, Some(&anchor))
            .unwrap();
        assert_eq!(result, DateDuration::new(1.0, 1.0, 0.0, 10.0).unwrap());

        let result = duration
            .balance_relative(TemporalUnit::Week, Some(&anchor))
            .unwrap();
        assert_eq!(result, DateDuration::new(0.0, 0.0, 58.0, 0.0).unwrap());
    }

    #[test]
    fn balance_months_into_years() {
        let anchor = PlainDate::new(2020, 6, 15, IsoCalendar).unwrap();
        let duration = DateDuration::new(0.0, 14.0, 0.0, 0.0).unwrap();
        let result = duration
            .balance_relative(TemporalUnit::Year, Some(&anchor))
            .unwrap();
        assert_eq!(result, DateDuration::new(1.0, 2.0, 0.0, 0.0).unwrap());
    }

    #[test]
    fn balance_negative_days_into_months() {
        let anchor = PlainDate::new(2020, 3, 31, IsoCalendar).unwrap();
        // Stepping back one month lands on 2020-02-29, 31 days earlier.
        let duration = DateDuration::new(0.0, 0.0, 0.0, -40.0).unwrap();
        let result = duration
            .balance_relative(TemporalUnit::Month, Some(&anchor))
            .unwrap();
        assert_eq!(result, DateDuration::new(0.0, -1.0, 0.0, -9.0).unwrap());
    }

    #[test]
    fn balance_without_anchor_is_a_range_error() {
        let duration = DateDuration::new(0.0, 0.0, 0.0, 40.0).unwrap();
        let err = duration
            .balance_relative::<IsoCalendar>(TemporalUnit::Month, None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(
            duration
                .balance_relative::<IsoCalendar>(TemporalUnit::Day, None)
                .unwrap(),
            duration
        );
    }
}
