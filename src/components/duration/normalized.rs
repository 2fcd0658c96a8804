//! This module implements the exact nanosecond accumulator for the time portion
//! of a `Duration`.

use num_bigint::BigInt;
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};

use crate::{
    components::{
        calendar::CalendarProtocol, tz::TzProtocol, zoneddatetime::add_instant, ZonedDateTime,
    },
    options::{ArithmeticOverflow, RoundingMode, TemporalUnit},
    primitive::FiniteF64,
    rounding::IncrementRounder,
    Sign, TemporalError, TemporalResult, NS_PER_DAY,
};

use super::{DateDuration, Duration, TimeDuration};

/// A total of nanoseconds held as an arbitrary precision integer.
///
/// Summing nanosecond values over spans of years exceeds the range in which an
/// `f64` is exact, so all time totals are accumulated here.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct NormalizedTimeDuration(pub(crate) BigInt);

/// The result of splitting a `NormalizedTimeDuration` into days.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DaysRecord {
    /// The whole days.
    pub(crate) days: f64,
    /// The nanoseconds left over after the whole days.
    pub(crate) remainder: NormalizedTimeDuration,
    /// The length in nanoseconds of the day following the whole days.
    pub(crate) day_length: i128,
}

impl NormalizedTimeDuration {
    /// Creates a `NormalizedTimeDuration` from a nanosecond value.
    #[inline]
    pub(crate) fn from_nanoseconds(nanoseconds: i128) -> Self {
        Self(BigInt::from(nanoseconds))
    }

    /// Returns the exact total of a `TimeDuration`.
    #[inline]
    pub(crate) fn from_time_duration(time: &TimeDuration) -> TemporalResult<Self> {
        total_duration_nanoseconds(0.0, time, 0)
    }

    /// Returns the difference of `one - two` as a `NormalizedTimeDuration`.
    #[inline]
    pub(crate) fn from_nanosecond_difference(one: i128, two: i128) -> Self {
        Self(BigInt::from(one) - BigInt::from(two))
    }

    /// Returns the sign of this total.
    #[inline]
    pub(crate) fn sign(&self) -> Sign {
        if self.0.is_negative() {
            Sign::Negative
        } else if self.0.is_zero() {
            Sign::Zero
        } else {
            Sign::Positive
        }
    }

    #[inline]
    pub(crate) fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns this total as an `i128`, failing if it exceeds that range.
    pub(crate) fn to_i128(&self) -> TemporalResult<i128> {
        self.0.to_i128().ok_or(
            TemporalError::range().with_message("Nanoseconds exceeded a valid range."),
        )
    }

    /// Adds this total to an epoch nanosecond value.
    pub(crate) fn checked_add_to(&self, epoch_nanos: i128) -> TemporalResult<i128> {
        (BigInt::from(epoch_nanos) + &self.0).to_i128().ok_or(
            TemporalError::range().with_message("Instant is outside valid limits."),
        )
    }

    /// Returns the magnitude of the whole seconds in this total.
    pub(crate) fn seconds(&self) -> TemporalResult<u64> {
        (self.0.magnitude() / 1_000_000_000u32)
            .to_u64()
            .ok_or(TemporalError::range().with_message("seconds exceeded a valid range."))
    }

    /// Returns the magnitude of the nanoseconds below one second in this total.
    pub(crate) fn subseconds(&self) -> TemporalResult<u32> {
        (self.0.magnitude() % 1_000_000_000u32)
            .to_u32()
            .ok_or(TemporalError::assert())
    }

    /// Returns `self / divisor` as a possibly fractional `f64`.
    pub(crate) fn divide(&self, divisor: u64) -> f64 {
        let divisor = BigInt::from(divisor);
        let quotient = &self.0 / &divisor;
        let remainder = &self.0 % &divisor;
        let whole = quotient.to_f64().unwrap_or(f64::NAN);
        let fraction = remainder.to_f64().unwrap_or(0.0) / divisor.to_f64().unwrap_or(1.0);
        whole + fraction
    }

    /// `RoundNormalizedTimeDurationToIncrement`
    ///
    /// Rounds this total to a multiple of `increment` nanoseconds.
    pub(crate) fn round(&self, increment: u64, mode: RoundingMode) -> Self {
        Self(
            IncrementRounder::from_signed_num(self.0.clone(), BigInt::from(increment))
                .round(mode),
        )
    }

    /// `NanosecondsToDays` for a total that is not anchored to a time zone.
    ///
    /// Every day is exactly 24 hours long.
    pub(crate) fn to_days(&self) -> TemporalResult<DaysRecord> {
        let day_length = BigInt::from(NS_PER_DAY);
        // NOTE: `BigInt` division truncates towards zero.
        let days = &self.0 / &day_length;
        let remainder = &self.0 % &day_length;
        Ok(DaysRecord {
            days: FiniteF64::try_from(&days)?.as_inner(),
            remainder: Self(remainder),
            day_length: i128::from(NS_PER_DAY),
        })
    }

    /// `NanosecondsToDays` for a total that starts at a zoned instant.
    ///
    /// Days are measured on the wall-clock of the zone, so a day may be longer or
    /// shorter than 24 hours when it contains an offset transition.
    pub(crate) fn to_days_zoned<C: CalendarProtocol, Z: TzProtocol>(
        &self,
        relative_to: &ZonedDateTime<C, Z>,
    ) -> TemporalResult<DaysRecord> {
        // 1. Let dayLengthNs be nsPerDay.
        // 2. If nanoseconds = 0, then
        if self.is_zero() {
            // a. Return the Record { [[Days]]: 0, [[Nanoseconds]]: 0, [[DayLength]]: dayLengthNs }.
            return Ok(DaysRecord {
                days: 0.0,
                remainder: Self::default(),
                day_length: i128::from(NS_PER_DAY),
            });
        }
        // 3. Let sign be ! ℝ(Sign(𝔽(nanoseconds))).
        let sign = i128::from(self.sign() as i8);

        // 5. Let startNs be ℝ(relativeTo.[[Nanoseconds]]).
        let start_ns = relative_to.epoch_nanoseconds();
        // 6. Let endNs be startNs + nanoseconds.
        let end_ns = add_instant(start_ns, self)?;

        // 8-9. Let startDateTime and endDateTime be ? GetPlainDateTimeFor(timeZone, instant, calendar).
        let start_dt = relative_to.to_iso_datetime()?;
        let end_dt = relative_to.tz().get_iso_datetime_for(end_ns)?;

        // 10. Let dateDifference be ? DifferenceISODateTime(startDateTime, endDateTime, calendar, "day").
        // 11. Let days be dateDifference.[[Days]].
        let mut days = relative_to
            .diff_iso_date_time(&start_dt, &end_dt, TemporalUnit::Day)?
            .days;

        // 12. Let intermediateNs be ℝ(? AddZonedDateTime(startNs, timeZone, calendar, 0, 0, 0, days, 0, 0, 0, 0, 0, 0)).
        let mut intermediate_ns = add_days(relative_to, days)?;

        // 13. Back off while the whole days overshoot the end.
        while days != 0.0 && (intermediate_ns - end_ns) * sign > 0 {
            days -= sign as f64;
            intermediate_ns = add_days(relative_to, days)?;
        }

        // 14. Set nanoseconds to endNs - intermediateNs.
        let mut nanoseconds = end_ns - intermediate_ns;

        // 15-16. Repeat while the remainder still covers a whole day.
        let mut intermediate = relative_to.with_epoch_nanos(intermediate_ns)?;
        loop {
            // a. Let oneDayFartherNs be ℝ(? AddZonedDateTime(intermediateNs, timeZone, calendar, 0, 0, 0, sign, 0, 0, 0, 0, 0, 0)).
            let one_day_farther = add_days(&intermediate, sign as f64)?;
            // b. Set dayLengthNs to oneDayFartherNs - intermediateNs.
            let day_length = one_day_farther - intermediate.epoch_nanoseconds();
            // c. If (nanoseconds - dayLengthNs) × sign ≥ 0, then
            if (nanoseconds - day_length) * sign >= 0 {
                // i. Set nanoseconds to nanoseconds - dayLengthNs.
                nanoseconds -= day_length;
                // ii. Set intermediateNs to oneDayFartherNs.
                intermediate = intermediate.with_epoch_nanos(one_day_farther)?;
                // iii. Set days to days + sign.
                days += sign as f64;
            } else {
                // d. Else, set done to true.
                // 17. Return the Record { [[Days]]: days, [[Nanoseconds]]: nanoseconds, [[DayLength]]: abs(dayLengthNs) }.
                return Ok(DaysRecord {
                    days,
                    remainder: Self::from_nanoseconds(nanoseconds),
                    day_length: day_length.abs(),
                });
            }
        }
    }
}

/// Adds whole days on the wall-clock of the zone.
#[inline]
fn add_days<C: CalendarProtocol, Z: TzProtocol>(
    zdt: &ZonedDateTime<C, Z>,
    days: f64,
) -> TemporalResult<i128> {
    zdt.add_as_instant(
        &Duration::from_date_duration(&DateDuration::new_unchecked(0.0, 0.0, 0.0, days)),
        ArithmeticOverflow::Constrain,
    )
}

/// Converts a field value to an exact integer, rejecting any fractional part.
#[inline]
fn to_bigint(value: f64) -> TemporalResult<BigInt> {
    if !value.is_finite() {
        return Err(TemporalError::range().with_message("number value is not a finite value."));
    }
    if value.fract() != 0.0 {
        return Err(TemporalError::range()
            .with_message("Duration fields must be integers to be totaled exactly."));
    }
    BigInt::from_f64(value)
        .ok_or(TemporalError::range().with_message("number value is not a finite value."))
}

/// `TotalDurationNanoseconds`
///
/// Returns the exact total of the day and time fields. `offset_shift` is added
/// when `days` is not zero.
pub(crate) fn total_duration_nanoseconds(
    days: f64,
    time: &TimeDuration,
    offset_shift: i128,
) -> TemporalResult<NormalizedTimeDuration> {
    let mut nanoseconds = to_bigint(time.nanoseconds)?;
    // 1. If days ≠ 0, then
    if days != 0.0 {
        // a. Set nanoseconds to nanoseconds + offsetShift.
        nanoseconds += offset_shift;
    }
    // 2. Set hours to hours + days × 24.
    let hours = to_bigint(time.hours)? + to_bigint(days)? * 24;
    // 3. Set minutes to minutes + hours × 60.
    let minutes = to_bigint(time.minutes)? + hours * 60;
    // 4. Set seconds to seconds + minutes × 60.
    let seconds = to_bigint(time.seconds)? + minutes * 60;
    // 5. Set milliseconds to milliseconds + seconds × 1000.
    let milliseconds = to_bigint(time.milliseconds)? + seconds * 1_000;
    // 6. Set microseconds to microseconds + milliseconds × 1000.
    let microseconds = to_bigint(time.microseconds)? + milliseconds * 1_000;
    // 7. Return nanoseconds + microseconds × 1000.
    Ok(NormalizedTimeDuration(nanoseconds + microseconds * 1_000))
}
