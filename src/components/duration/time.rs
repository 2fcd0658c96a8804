//! An implementation of `TimeDuration` and it's methods.

use num_bigint::BigInt;
use num_traits::Signed;

use crate::{
    components::{calendar::CalendarProtocol, tz::TzProtocol, ZonedDateTime},
    options::{RelativeTo, TemporalUnit},
    primitive::FiniteF64,
    TemporalError, TemporalResult,
};

use super::{
    calculate_offset_shift, is_integral_duration, is_valid_duration,
    normalized::{total_duration_nanoseconds, NormalizedTimeDuration},
    DateDuration,
};

/// `TimeDuration` represents the [Time Duration record][spec] of the `Duration.`
///
/// These fields are laid out in the [Temporal Proposal][field spec] as 64-bit floating point numbers.
///
/// [spec]: https://tc39.es/proposal-temporal/#sec-temporal-time-duration-records
/// [field spec]: https://tc39.es/proposal-temporal/#sec-properties-of-temporal-duration-instances
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TimeDuration {
    /// `TimeDuration`'s internal hour value.
    pub hours: f64,
    /// `TimeDuration`'s internal minute value.
    pub minutes: f64,
    /// `TimeDuration`'s internal second value.
    pub seconds: f64,
    /// `TimeDuration`'s internal millisecond value.
    pub milliseconds: f64,
    /// `TimeDuration`'s internal microsecond value.
    pub microseconds: f64,
    /// `TimeDuration`'s internal nanosecond value.
    pub nanoseconds: f64,
}

// ==== TimeDuration Private API ====

impl TimeDuration {
    /// Creates a new `TimeDuration`.
    #[must_use]
    pub(crate) const fn new_unchecked(
        hours: f64,
        minutes: f64,
        seconds: f64,
        milliseconds: f64,
        microseconds: f64,
        nanoseconds: f64,
    ) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            milliseconds,
            microseconds,
            nanoseconds,
        }
    }

    /// `BalanceDuration` without a zoned anchor.
    ///
    /// Balances `days` and this time duration so that no unit coarser than
    /// `largest_unit` is populated. Returns a tuple of the balanced days and the
    /// balanced `TimeDuration`.
    pub(crate) fn balance(
        days: f64,
        time: &Self,
        largest_unit: TemporalUnit,
    ) -> TemporalResult<(f64, Self)> {
        // 2. Let nanoseconds be ! TotalDurationNanoseconds(days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds, 0).
        let norm = total_duration_nanoseconds(days, time, 0)?;

        // 3. If largestUnit is one of "year", "month", "week", or "day", then
        if largest_unit.is_date_unit() {
            // a. Let result be ? NanosecondsToDays(nanoseconds, relativeTo).
            let result = norm.to_days()?;
            // b. Set days to result.[[Days]].
            // c. Set nanoseconds to result.[[Nanoseconds]].
            Self::from_normalized(result.days, &result.remainder, largest_unit)
        } else {
            // 4. Else, set days to 0.
            Self::from_normalized(0.0, &norm, largest_unit)
        }
    }

    /// `BalanceDuration`
    ///
    /// Balances `days` and this time duration with an optional zoned anchor. When the
    /// anchor is present, days are measured on the wall-clock of its time zone.
    pub(crate) fn balance_relative<C: CalendarProtocol, Z: TzProtocol>(
        days: f64,
        time: &Self,
        largest_unit: TemporalUnit,
        relative_to: Option<&ZonedDateTime<C, Z>>,
    ) -> TemporalResult<(f64, Self)> {
        let Some(zdt) = relative_to else {
            return Self::balance(days, time, largest_unit);
        };

        // 1. If relativeTo is a zoned anchor, compute the offset shift across the days.
        let offset_shift = calculate_offset_shift(
            Some(RelativeTo::ZonedDateTime(zdt)),
            &DateDuration::new_unchecked(0.0, 0.0, 0.0, days),
        )?;
        // 2. Let nanoseconds be ! TotalDurationNanoseconds(days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds, offsetShift).
        let norm = total_duration_nanoseconds(days, time, offset_shift)?;

        if largest_unit.is_date_unit() {
            let result = norm.to_days_zoned(zdt)?;
            Self::from_normalized(result.days, &result.remainder, largest_unit)
        } else {
            Self::from_normalized(0.0, &norm, largest_unit)
        }
    }

    /// Splits a nanosecond total into the units at or below `largest_unit`.
    ///
    /// Returns a tuple of the provided days and the resulting `TimeDuration`.
    ///
    /// # Errors:
    ///   - Will error if the balanced record is not a valid duration.
    pub(crate) fn from_normalized(
        days: f64,
        norm: &NormalizedTimeDuration,
        largest_unit: TemporalUnit,
    ) -> TemporalResult<(f64, Self)> {
        // 5. Set hours, minutes, seconds, milliseconds, and microseconds to 0.
        let zero = BigInt::default();
        let (mut hours, mut minutes, mut seconds) = (zero.clone(), zero.clone(), zero.clone());
        let (mut milliseconds, mut microseconds) = (zero.clone(), zero);

        // 6. If nanoseconds < 0, let sign be -1; else, let sign be 1.
        let sign = if norm.0.is_negative() { -1f64 } else { 1f64 };
        // 7. Set nanoseconds to abs(nanoseconds).
        let mut nanoseconds = norm.0.abs();

        // 8-14. Cascade the nanoseconds up to the largest unit.
        if largest_unit >= TemporalUnit::Microsecond {
            (microseconds, nanoseconds) = div_rem(&nanoseconds, 1_000);
        }
        if largest_unit >= TemporalUnit::Millisecond {
            (milliseconds, microseconds) = div_rem(&microseconds, 1_000);
        }
        if largest_unit >= TemporalUnit::Second {
            (seconds, milliseconds) = div_rem(&milliseconds, 1_000);
        }
        if largest_unit >= TemporalUnit::Minute {
            (minutes, seconds) = div_rem(&seconds, 60);
        }
        if largest_unit >= TemporalUnit::Hour {
            (hours, minutes) = div_rem(&minutes, 60);
        }

        // 15. Return ? CreateTimeDurationRecord(days, hours × sign, minutes × sign, seconds × sign, milliseconds × sign, microseconds × sign, nanoseconds × sign).
        let result = Self::new_unchecked(
            FiniteF64::try_from(&hours)?.copysign(sign).as_inner(),
            FiniteF64::try_from(&minutes)?.copysign(sign).as_inner(),
            FiniteF64::try_from(&seconds)?.copysign(sign).as_inner(),
            FiniteF64::try_from(&milliseconds)?.copysign(sign).as_inner(),
            FiniteF64::try_from(&microseconds)?.copysign(sign).as_inner(),
            FiniteF64::try_from(&nanoseconds)?.copysign(sign).as_inner(),
        );

        let mut fields = [0f64; 7];
        fields[0] = days;
        fields[1..].copy_from_slice(&result.fields());
        if !is_valid_duration(&fields) {
            return Err(TemporalError::range().with_message("Invalid balance TimeDuration."));
        }

        Ok((days, result))
    }

    /// Returns the value of `TimeDuration`'s fields.
    #[inline]
    #[must_use]
    pub(crate) fn fields(&self) -> [f64; 6] {
        [
            self.hours,
            self.minutes,
            self.seconds,
            self.milliseconds,
            self.microseconds,
            self.nanoseconds,
        ]
    }
}

// ==== TimeDuration's public API ====

impl TimeDuration {
    /// Creates a new validated `TimeDuration`.
    pub fn new(
        hours: f64,
        minutes: f64,
        seconds: f64,
        milliseconds: f64,
        microseconds: f64,
        nanoseconds: f64,
    ) -> TemporalResult<Self> {
        let result = Self::new_unchecked(
            hours,
            minutes,
            seconds,
            milliseconds,
            microseconds,
            nanoseconds,
        );
        if !is_valid_duration(&result.fields()) {
            return Err(
                TemporalError::range().with_message("Attempted to create an invalid TimeDuration.")
            );
        }
        if !is_integral_duration(&result.fields()) {
            return Err(TemporalError::range().with_message("TimeDuration fields must be integers."));
        }
        Ok(result)
    }

    /// Returns a new `TimeDuration` representing the absolute value of the current.
    #[inline]
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            hours: self.hours.abs(),
            minutes: self.minutes.abs(),
            seconds: self.seconds.abs(),
            milliseconds: self.milliseconds.abs(),
            microseconds: self.microseconds.abs(),
            nanoseconds: self.nanoseconds.abs(),
        }
    }

    /// Returns a negated `TimeDuration`.
    #[inline]
    #[must_use]
    pub fn negated(&self) -> Self {
        let negate = |v: f64| FiniteF64(v).negate().as_inner();
        Self {
            hours: negate(self.hours),
            minutes: negate(self.minutes),
            seconds: negate(self.seconds),
            milliseconds: negate(self.milliseconds),
            microseconds: negate(self.microseconds),
            nanoseconds: negate(self.nanoseconds),
        }
    }

    /// Returns whether every field is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.fields().iter().all(|v| *v == 0.0)
    }

    /// Utility function for returning if values in a valid range.
    #[inline]
    #[must_use]
    pub fn is_within_range(&self) -> bool {
        self.hours.abs() < 24f64
            && self.minutes.abs() < 60f64
            && self.seconds.abs() < 60f64
            && self.milliseconds.abs() < 1000f64
            && self.microseconds.abs() < 1000f64
            && self.nanoseconds.abs() < 1000f64
    }
}

#[inline]
fn div_rem(dividend: &BigInt, divisor: u32) -> (BigInt, BigInt) {
    let divisor = BigInt::from(divisor);
    (dividend / &divisor, dividend % &divisor)
}
