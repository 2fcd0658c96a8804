//! This module implements `Duration` along with it's methods and components.

use core::{cmp::Ordering, str::FromStr};

use ixdtf::{parsers::IsoDurationParser, records::TimeDurationRecord};
use num_traits::FromPrimitive;

use crate::{
    components::{
        calendar::{CalendarProtocol, IsoCalendar},
        tz::{TzProtocol, UtcOffset},
    },
    options::{
        ArithmeticOverflow, RelativeTo, ResolvedRoundingOptions, RoundingIncrement, RoundingMode,
        RoundingOptions, TemporalUnit, ToStringRoundingOptions,
    },
    parsers::{FormattableDateDuration, FormattableDuration, FormattableTimeDuration, Precision},
    primitive::FiniteF64,
    rounding::IncrementRounder,
    temporal_assert, Sign, TemporalError, TemporalResult, TemporalUnwrap, MAX_SAFE_INTEGER,
};

use self::normalized::{total_duration_nanoseconds, NormalizedTimeDuration};

mod date;
pub(crate) mod normalized;
mod time;

#[cfg(test)]
mod tests;

#[doc(inline)]
pub use date::DateDuration;
#[doc(inline)]
pub use time::TimeDuration;

/// A `PartialDuration` is a Duration that may have fields not set.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct PartialDuration {
    /// A potentially existent `years` field.
    pub years: Option<FiniteF64>,
    /// A potentially existent `months` field.
    pub months: Option<FiniteF64>,
    /// A potentially existent `weeks` field.
    pub weeks: Option<FiniteF64>,
    /// A potentially existent `days` field.
    pub days: Option<FiniteF64>,
    /// A potentially existent `hours` field.
    pub hours: Option<FiniteF64>,
    /// A potentially existent `minutes` field.
    pub minutes: Option<FiniteF64>,
    /// A potentially existent `seconds` field.
    pub seconds: Option<FiniteF64>,
    /// A potentially existent `milliseconds` field.
    pub milliseconds: Option<FiniteF64>,
    /// A potentially existent `microseconds` field.
    pub microseconds: Option<FiniteF64>,
    /// A potentially existent `nanoseconds` field.
    pub nanoseconds: Option<FiniteF64>,
}

impl PartialDuration {
    /// Returns whether the `PartialDuration` is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merges the present fields of this `PartialDuration` over `base`.
    ///
    /// Absent fields keep the value of `base`. The merged record is validated.
    pub fn merge_over(&self, base: &Duration) -> TemporalResult<Duration> {
        let pick = |field: Option<FiniteF64>, fallback: f64| field.map_or(fallback, f64::from);
        Duration::new(
            pick(self.years, base.years()),
            pick(self.months, base.months()),
            pick(self.weeks, base.weeks()),
            pick(self.days, base.days()),
            pick(self.hours, base.hours()),
            pick(self.minutes, base.minutes()),
            pick(self.seconds, base.seconds()),
            pick(self.milliseconds, base.milliseconds()),
            pick(self.microseconds, base.microseconds()),
            pick(self.nanoseconds, base.nanoseconds()),
        )
    }
}

/// A dynamic value that exposes duration fields by property name.
///
/// The recognized property names are `years`, `months`, `weeks`, `days`,
/// `hours`, `minutes`, `seconds`, `milliseconds`, `microseconds`, and
/// `nanoseconds`.
pub trait DurationLikeObject {
    /// Reads the property `name`, returning `None` when it is not present.
    fn get_property(&self, name: &str) -> TemporalResult<Option<f64>>;
}

/// A value that can be coerced into a `Duration`.
#[derive(Clone, Copy)]
pub enum DurationLike<'a> {
    /// An existing `Duration`.
    Duration(Duration),
    /// A dynamic object exposing duration fields.
    Object(&'a dyn DurationLikeObject),
    /// A duration string, for example `P1Y2M3DT4H`.
    String(&'a str),
}

impl core::fmt::Debug for DurationLike<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Duration(d) => f.debug_tuple("Duration").field(d).finish(),
            Self::Object(_) => f.write_str("Object"),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
        }
    }
}

impl From<Duration> for DurationLike<'_> {
    fn from(value: Duration) -> Self {
        Self::Duration(value)
    }
}

impl<'a> From<&'a str> for DurationLike<'a> {
    fn from(value: &'a str) -> Self {
        Self::String(value)
    }
}

/// The native Rust implementation of `Temporal.Duration`.
///
/// `Duration` is made up of a `DateDuration` and `TimeDuration` as primarily
/// defined by Abtract Operation 7.5.1-5.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Duration {
    date: DateDuration,
    time: TimeDuration,
}

impl core::fmt::Display for Duration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let formattable =
            duration_to_formattable(self, Precision::Auto).map_err(|_| core::fmt::Error)?;
        core::fmt::Display::fmt(&formattable, f)
    }
}

/// The result of `RoundDuration`: the rounded record along with the fractional
/// amount of the rounding unit that was rounded away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RoundedDuration {
    pub(crate) duration: Duration,
    pub(crate) remainder: f64,
}

// NOTE(nekevss): Structure of the below is going to be a little convoluted,
// but intended to section everything based on the below
//
// Notation - [section](sub-section(s)).
//
// Sections:
//   - Creation (private/public)
//   - Getters
//   - Methods (private/public)
//

// ==== Private Creation methods ====

impl Duration {
    /// Creates a new `Duration` from a `DateDuration` and `TimeDuration`.
    #[inline]
    pub(crate) const fn new_unchecked(date: DateDuration, time: TimeDuration) -> Self {
        Self { date, time }
    }

    /// Creates a validated `Duration` from a `DateDuration` and `TimeDuration`.
    #[inline]
    pub(crate) fn from_parts(date: &DateDuration, time: &TimeDuration) -> TemporalResult<Self> {
        let duration = Self::new_unchecked(*date, *time);
        if !is_valid_duration(&duration.fields()) {
            return Err(TemporalError::range().with_message("Duration was not valid."));
        }
        Ok(duration)
    }

    /// Returns the an array of the fields values.
    #[inline]
    #[must_use]
    pub(crate) fn fields(&self) -> [f64; 10] {
        [
            self.years(),
            self.months(),
            self.weeks(),
            self.days(),
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.milliseconds(),
            self.microseconds(),
            self.nanoseconds(),
        ]
    }

    /// Returns whether any of years, months, or weeks is non-zero.
    #[inline]
    pub(crate) fn has_calendar_units(&self) -> bool {
        self.years() != 0.0 || self.months() != 0.0 || self.weeks() != 0.0
    }

    /// `DefaultTemporalLargestUnit`
    ///
    /// Returns the `TemporalUnit` corresponding to the largest non-zero field.
    #[inline]
    pub(crate) fn default_largest_unit(&self) -> TemporalUnit {
        self.fields()
            .iter()
            .enumerate()
            .find(|x| x.1 != &0.0)
            .map(|x| TemporalUnit::from(10 - x.0))
            .unwrap_or(TemporalUnit::Nanosecond)
    }

    /// Returns the value of the field for `unit`.
    fn unit_value(&self, unit: TemporalUnit) -> f64 {
        match unit {
            TemporalUnit::Year => self.years(),
            TemporalUnit::Month => self.months(),
            TemporalUnit::Week => self.weeks(),
            TemporalUnit::Day => self.days(),
            TemporalUnit::Hour => self.hours(),
            TemporalUnit::Minute => self.minutes(),
            TemporalUnit::Second => self.seconds(),
            TemporalUnit::Millisecond => self.milliseconds(),
            TemporalUnit::Microsecond => self.microseconds(),
            TemporalUnit::Nanosecond => self.nanoseconds(),
            TemporalUnit::Auto => 0.0,
        }
    }
}

// ==== Public Duration API ====

impl Duration {
    /// Creates a new validated `Duration`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        years: f64,
        months: f64,
        weeks: f64,
        days: f64,
        hours: f64,
        minutes: f64,
        seconds: f64,
        milliseconds: f64,
        microseconds: f64,
        nanoseconds: f64,
    ) -> TemporalResult<Self> {
        let duration = Self::from_parts(
            &DateDuration::new_unchecked(years, months, weeks, days),
            &TimeDuration::new_unchecked(
                hours,
                minutes,
                seconds,
                milliseconds,
                microseconds,
                nanoseconds,
            ),
        )?;
        if !is_integral_duration(&duration.fields()) {
            return Err(TemporalError::range().with_message("Duration fields must be integers."));
        }
        Ok(duration)
    }

    /// Creates a `Duration` from only a `DateDuration`.
    #[must_use]
    pub fn from_date_duration(date: &DateDuration) -> Self {
        Self {
            date: *date,
            time: TimeDuration::default(),
        }
    }

    /// Creates a `Duration` from a provided a day and a `TimeDuration`.
    ///
    /// Note: `TimeDuration` records can store a day value to deal with overflow.
    #[must_use]
    pub fn from_day_and_time(day: f64, time: &TimeDuration) -> Self {
        Self {
            date: DateDuration::new_unchecked(0.0, 0.0, 0.0, day),
            time: *time,
        }
    }

    /// Creates a `Duration` from a provided `PartialDuration`.
    ///
    /// Absent fields default to zero.
    pub fn from_partial_duration(partial: PartialDuration) -> TemporalResult<Self> {
        if partial.is_empty() {
            return Err(TemporalError::r#type()
                .with_message("PartialDuration cannot have all empty fields."));
        }
        partial.merge_over(&Self::default())
    }

    /// Return if the Durations values are within their valid ranges.
    #[inline]
    #[must_use]
    pub fn is_time_within_range(&self) -> bool {
        self.time.is_within_range()
    }
}

// ==== Public `Duration` Getters ====

impl Duration {
    /// Returns a reference to the inner `TimeDuration`
    #[inline]
    #[must_use]
    pub fn time(&self) -> &TimeDuration {
        &self.time
    }

    /// Returns a reference to the inner `DateDuration`
    #[inline]
    #[must_use]
    pub fn date(&self) -> &DateDuration {
        &self.date
    }

    /// Returns the `years` field of duration.
    #[inline]
    #[must_use]
    pub const fn years(&self) -> f64 {
        self.date.years
    }

    /// Returns the `months` field of duration.
    #[inline]
    #[must_use]
    pub const fn months(&self) -> f64 {
        self.date.months
    }

    /// Returns the `weeks` field of duration.
    #[inline]
    #[must_use]
    pub const fn weeks(&self) -> f64 {
        self.date.weeks
    }

    /// Returns the `days` field of duration.
    #[inline]
    #[must_use]
    pub const fn days(&self) -> f64 {
        self.date.days
    }

    /// Returns the `hours` field of duration.
    #[inline]
    #[must_use]
    pub const fn hours(&self) -> f64 {
        self.time.hours
    }

    /// Returns the `minutes` field of duration.
    #[inline]
    #[must_use]
    pub const fn minutes(&self) -> f64 {
        self.time.minutes
    }

    /// Returns the `seconds` field of duration.
    #[inline]
    #[must_use]
    pub const fn seconds(&self) -> f64 {
        self.time.seconds
    }

    /// Returns the `milliseconds` field of duration.
    #[inline]
    #[must_use]
    pub const fn milliseconds(&self) -> f64 {
        self.time.milliseconds
    }

    /// Returns the `microseconds` field of duration.
    #[inline]
    #[must_use]
    pub const fn microseconds(&self) -> f64 {
        self.time.microseconds
    }

    /// Returns the `nanoseconds` field of duration.
    #[inline]
    #[must_use]
    pub const fn nanoseconds(&self) -> f64 {
        self.time.nanoseconds
    }
}

// ==== Public Duration methods ====

impl Duration {
    /// Determines the sign for the current self.
    #[inline]
    #[must_use]
    pub fn sign(&self) -> Sign {
        duration_sign(&self.fields())
    }

    /// Returns whether the current `Duration` is zero.
    ///
    /// Equivalant to `Temporal.Duration.blank()`.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.sign() == Sign::Zero
    }

    /// Returns a negated `Duration`
    #[inline]
    #[must_use]
    pub fn negated(&self) -> Self {
        Self {
            date: self.date().negated(),
            time: self.time().negated(),
        }
    }

    /// Returns the absolute value of `Duration`.
    #[inline]
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            date: self.date().abs(),
            time: self.time().abs(),
        }
    }

    /// Returns a new `Duration` with the present fields of `partial` replacing
    /// the fields of this duration.
    pub fn with(&self, partial: &PartialDuration) -> TemporalResult<Self> {
        if partial.is_empty() {
            return Err(TemporalError::r#type()
                .with_message("PartialDuration cannot have all empty fields."));
        }
        partial.merge_over(self)
    }

    /// Adds two durations that have no calendar units.
    ///
    /// Fails with a `RangeError` when either duration has years, months, or weeks.
    pub fn add(&self, other: &Self) -> TemporalResult<Self> {
        add_duration::<IsoCalendar, UtcOffset>(self, other, None)
    }

    /// Subtracts `other` from this duration, see [`Duration::add`].
    pub fn subtract(&self, other: &Self) -> TemporalResult<Self> {
        self.add(&other.negated())
    }

    /// Adds two durations, resolving calendar units against `relative_to`.
    pub fn add_relative<C: CalendarProtocol, Z: TzProtocol>(
        &self,
        other: &Self,
        relative_to: RelativeTo<'_, C, Z>,
    ) -> TemporalResult<Self> {
        add_duration(self, other, Some(relative_to))
    }

    /// Subtracts `other` from this duration, resolving calendar units against `relative_to`.
    pub fn subtract_relative<C: CalendarProtocol, Z: TzProtocol>(
        &self,
        other: &Self,
        relative_to: RelativeTo<'_, C, Z>,
    ) -> TemporalResult<Self> {
        add_duration(self, &other.negated(), Some(relative_to))
    }

    /// Rounds the current `Duration` according to `options`.
    pub fn round<C: CalendarProtocol, Z: TzProtocol>(
        &self,
        options: RoundingOptions,
        relative_to: Option<RelativeTo<'_, C, Z>>,
    ) -> TemporalResult<Self> {
        // 1-17. Resolve the rounding options.
        let existing_largest_unit = self.default_largest_unit();
        let resolved = ResolvedRoundingOptions::from_duration_options(options, existing_largest_unit)?;
        let zoned_relative_to = relative_to.and_then(RelativeTo::as_zoned_date_time);

        // 18. If the rounding cannot change the duration, return it unchanged.
        if resolved.is_noop()
            && resolved.largest_unit == existing_largest_unit
            && !self.has_calendar_units()
            && !(self.days() != 0.0 && zoned_relative_to.is_some())
            && self.hours().abs() < 24.0
            && self.time.is_within_range()
        {
            return Ok(*self);
        }

        let plain_relative_to = relative_to.map(|r| r.to_plain_date()).transpose()?;

        // 19. Let unbalanceResult be ? UnbalanceDurationRelative(duration.[[Years]], duration.[[Months]], duration.[[Weeks]], duration.[[Days]], largestUnit, relativeTo).
        let unbalanced = self
            .date
            .unbalance_relative(resolved.largest_unit, plain_relative_to.as_ref())?;

        // 20. Let roundResult be (? RoundDuration(unbalanceResult.[[Years]], unbalanceResult.[[Months]], unbalanceResult.[[Weeks]],
        // unbalanceResult.[[Days]], duration.[[Hours]], duration.[[Minutes]], duration.[[Seconds]], duration.[[Milliseconds]],
        // duration.[[Microseconds]], duration.[[Nanoseconds]], roundingIncrement, smallestUnit, roundingMode, relativeTo)).[[DurationRecord]].
        let rounded = round_duration(
            &Self::new_unchecked(unbalanced, self.time),
            resolved.increment,
            resolved.smallest_unit,
            resolved.rounding_mode,
            relative_to,
        )?
        .duration;

        // 21. Let adjustResult be ? AdjustRoundedDurationDays(roundResult.[[Years]], ..., roundingIncrement, smallestUnit, roundingMode, relativeTo).
        let adjusted = adjust_rounded_duration_days(
            &rounded,
            resolved.increment,
            resolved.smallest_unit,
            resolved.rounding_mode,
            relative_to,
        )?;

        // 22. If relativeTo has an [[InitializedTemporalZonedDateTime]] internal slot, then
        // a. Set relativeTo to ? MoveRelativeZonedDateTime(relativeTo, adjustResult.[[Years]], adjustResult.[[Months]], adjustResult.[[Weeks]], 0).
        let moved = zoned_relative_to
            .map(|zdt| {
                zdt.move_relative(&DateDuration::new_unchecked(
                    adjusted.years(),
                    adjusted.months(),
                    adjusted.weeks(),
                    0.0,
                ))
            })
            .transpose()?;

        // 23. Let balanceResult be ? BalanceDuration(adjustResult.[[Days]], adjustResult.[[Hours]], ..., largestUnit, relativeTo).
        let (days, time) = TimeDuration::balance_relative(
            adjusted.days(),
            adjusted.time(),
            resolved.largest_unit,
            moved.as_ref(),
        )?;

        // 24. Let result be ? BalanceDurationRelative(adjustResult.[[Years]], adjustResult.[[Months]], adjustResult.[[Weeks]], balanceResult.[[Days]], largestUnit, relativeTo).
        let balance_anchor = match moved.as_ref() {
            Some(zdt) => Some(zdt.to_plain_date()?),
            None => plain_relative_to,
        };
        let result = DateDuration::new_unchecked(
            adjusted.years(),
            adjusted.months(),
            adjusted.weeks(),
            days,
        )
        .balance_relative(resolved.largest_unit, balance_anchor.as_ref())?;

        // 25. Return ! CreateTemporalDuration(result.[[Years]], result.[[Months]], result.[[Weeks]], result.[[Days]],
        // balanceResult.[[Hours]], balanceResult.[[Minutes]], balanceResult.[[Seconds]], balanceResult.[[Milliseconds]],
        // balanceResult.[[Microseconds]], balanceResult.[[Nanoseconds]]).
        Self::from_parts(&result, &time)
    }

    /// Returns the total of this duration expressed in `unit`, including any
    /// fractional part.
    pub fn total<C: CalendarProtocol, Z: TzProtocol>(
        &self,
        unit: TemporalUnit,
        relative_to: Option<RelativeTo<'_, C, Z>>,
    ) -> TemporalResult<f64> {
        if unit == TemporalUnit::Auto {
            return Err(TemporalError::range().with_message("unit cannot be auto."));
        }
        let plain_relative_to = relative_to.map(|r| r.to_plain_date()).transpose()?;

        // 1. Let unbalanceResult be ? UnbalanceDurationRelative(duration.[[Years]], duration.[[Months]], duration.[[Weeks]], duration.[[Days]], unit, relativeTo).
        let unbalanced = self
            .date
            .unbalance_relative(unit, plain_relative_to.as_ref())?;

        // 2. Let intermediate be undefined.
        // 3. If relativeTo has an [[InitializedTemporalZonedDateTime]] internal slot, then
        // a. Set intermediate to ? MoveRelativeZonedDateTime(relativeTo, unbalanceResult.[[Years]], unbalanceResult.[[Months]], unbalanceResult.[[Weeks]], 0).
        let intermediate = relative_to
            .and_then(RelativeTo::as_zoned_date_time)
            .map(|zdt| {
                zdt.move_relative(&DateDuration::new_unchecked(
                    unbalanced.years,
                    unbalanced.months,
                    unbalanced.weeks,
                    0.0,
                ))
            })
            .transpose()?;

        // 4. Let balanceResult be ? BalanceDuration(unbalanceResult.[[Days]], duration.[[Hours]], ..., unit, intermediate).
        let (days, time) =
            TimeDuration::balance_relative(unbalanced.days, &self.time, unit, intermediate.as_ref())?;

        // 5. Let roundRecord be ? RoundDuration(unbalanceResult.[[Years]], unbalanceResult.[[Months]], unbalanceResult.[[Weeks]],
        // balanceResult.[[Days]], balanceResult.[[Hours]], ..., 1, unit, "trunc", relativeTo).
        let round_record = round_duration(
            &Self::new_unchecked(
                DateDuration::new_unchecked(
                    unbalanced.years,
                    unbalanced.months,
                    unbalanced.weeks,
                    days,
                ),
                time,
            ),
            RoundingIncrement::ONE,
            unit,
            RoundingMode::Trunc,
            relative_to,
        )?;

        // 6-7. Let whole be the field of roundResult that corresponds to unit.
        let whole = round_record.duration.unit_value(unit);
        // 8. Return 𝔽(whole + roundRecord.[[Remainder]]).
        Ok(whole + round_record.remainder)
    }

    /// Compares two durations, resolving calendar units against `relative_to`.
    pub fn compare<C: CalendarProtocol, Z: TzProtocol>(
        &self,
        other: &Self,
        relative_to: Option<RelativeTo<'_, C, Z>>,
    ) -> TemporalResult<Ordering> {
        // 5. If all fields are equal, return +0𝔽.
        if self == other {
            return Ok(Ordering::Equal);
        }
        // 6. Let shift1 be ? CalculateOffsetShift(relativeTo, one.[[Years]], one.[[Months]], one.[[Weeks]], one.[[Days]]).
        let shift_one = calculate_offset_shift(relative_to, &self.date)?;
        // 7. Let shift2 be ? CalculateOffsetShift(relativeTo, two.[[Years]], two.[[Months]], two.[[Weeks]], two.[[Days]]).
        let shift_two = calculate_offset_shift(relative_to, &other.date)?;

        // 8. If any of one or two has years, months, or weeks, then
        let (days_one, days_two) = if self.has_calendar_units() || other.has_calendar_units() {
            let plain_relative_to = relative_to.map(|r| r.to_plain_date()).transpose()?;
            // a. Let unbalanceResult1 be ? UnbalanceDurationRelative(one.[[Years]], one.[[Months]], one.[[Weeks]], one.[[Days]], "day", relativeTo).
            let one = self
                .date
                .unbalance_relative(TemporalUnit::Day, plain_relative_to.as_ref())?;
            // b. Let unbalanceResult2 be ? UnbalanceDurationRelative(two.[[Years]], two.[[Months]], two.[[Weeks]], two.[[Days]], "day", relativeTo).
            let two = other
                .date
                .unbalance_relative(TemporalUnit::Day, plain_relative_to.as_ref())?;
            (one.days, two.days)
        } else {
            // 9. Else, let days1 be one.[[Days]] and days2 be two.[[Days]].
            (self.days(), other.days())
        };

        // 10. Let ns1 be ! TotalDurationNanoseconds(days1, one.[[Hours]], ..., shift1).
        let ns_one = total_duration_nanoseconds(days_one, &self.time, shift_one)?;
        // 11. Let ns2 be ! TotalDurationNanoseconds(days2, two.[[Hours]], ..., shift2).
        let ns_two = total_duration_nanoseconds(days_two, &other.time, shift_two)?;
        // 12-14. Compare ns1 and ns2.
        Ok(ns_one.cmp(&ns_two))
    }

    /// Returns the `Duration` as a formatted string
    pub fn as_temporal_string(&self, options: ToStringRoundingOptions) -> TemporalResult<String> {
        // 1-7. Let precision be ? ToSecondsStringPrecisionRecord(smallestUnit, digits).
        let resolved = options.resolve()?;

        // 8. Let result be (? RoundDuration(duration.[[Years]], ..., precision.[[Increment]], precision.[[Unit]], roundingMode)).[[DurationRecord]].
        let rounded = if resolved.smallest_unit == TemporalUnit::Nanosecond
            && resolved.increment == RoundingIncrement::ONE
        {
            *self
        } else {
            round_duration::<IsoCalendar, UtcOffset>(
                self,
                resolved.increment,
                resolved.smallest_unit,
                resolved.mode,
                None,
            )?
            .duration
        };

        // 9. Return ! TemporalDurationToString(result.[[Years]], ..., precision.[[Precision]]).
        Ok(duration_to_formattable(&rounded, resolved.precision)?.to_string())
    }
}

// ==== Duration Coercers ====

/// `ToTemporalDuration`
///
/// Coerces a `DurationLike` into a validated `Duration`.
pub fn to_temporal_duration(item: DurationLike<'_>) -> TemporalResult<Duration> {
    match item {
        // 1. If Type(item) is Object and item has an [[InitializedTemporalDuration]] internal slot, then
        DurationLike::Duration(duration) => Duration::from_parts(duration.date(), duration.time()),
        // 2. Let result be ? ToTemporalDurationRecord(item).
        DurationLike::Object(object) => {
            Duration::from_partial_duration(to_partial_duration(object)?)
        }
        DurationLike::String(string) => Duration::from_str(string),
    }
}

/// `ToLimitedTemporalDuration`
///
/// Coerces a `DurationLike` into a validated `Duration`, failing if any field
/// for a unit in `disallowed_units` is non-zero.
pub fn to_limited_temporal_duration(
    item: DurationLike<'_>,
    disallowed_units: &[TemporalUnit],
) -> TemporalResult<Duration> {
    // 1. Let duration be ? ToTemporalDurationRecord(temporalDurationLike).
    let duration = to_temporal_duration(item)?;

    // 2. For each row of Table 7, except the header row, in table order, do
    for unit in disallowed_units {
        // a. Let prop be the Property Name value of the current row.
        // b. Let value be duration's internal slot whose name is the Internal Slot value of the current row.
        // c. If value is not 0 and disallowedFields contains prop, then
        if duration.unit_value(*unit) != 0.0 {
            // i. Throw a RangeError exception.
            return Err(TemporalError::range()
                .with_message(format!("{unit} is not allowed in this duration.")));
        }
    }

    // 3. Return duration.
    Ok(duration)
}

/// `ToTemporalPartialDurationRecord`
///
/// Reads the recognized duration properties of `object` in alphabetical order.
pub fn to_partial_duration(object: &dyn DurationLikeObject) -> TemporalResult<PartialDuration> {
    let read = |name: &str| -> TemporalResult<Option<FiniteF64>> {
        object
            .get_property(name)?
            .map(FiniteF64::to_integer_without_rounding)
            .transpose()
    };

    // 1-2. Let result be a new partial Duration Record with each field set to undefined.
    // 3. For each row of Table 7, except the header row, in table order, do
    let days = read("days")?;
    let hours = read("hours")?;
    let microseconds = read("microseconds")?;
    let milliseconds = read("milliseconds")?;
    let minutes = read("minutes")?;
    let months = read("months")?;
    let nanoseconds = read("nanoseconds")?;
    let seconds = read("seconds")?;
    let weeks = read("weeks")?;
    let years = read("years")?;

    let result = PartialDuration {
        years,
        months,
        weeks,
        days,
        hours,
        minutes,
        seconds,
        milliseconds,
        microseconds,
        nanoseconds,
    };

    // 4. If any is false, then
    if result.is_empty() {
        // a. Throw a TypeError exception.
        return Err(TemporalError::r#type()
            .with_message("Object does not have any recognized duration properties."));
    }

    // 5. Return result.
    Ok(result)
}

// ==== Duration Abstract Operations ====

/// `CalculateOffsetShift`
///
/// Returns the change in UTC offset, in nanoseconds, across the date portion of
/// a duration added to a zoned anchor. Non-zoned anchors always return 0.
pub(crate) fn calculate_offset_shift<C: CalendarProtocol, Z: TzProtocol>(
    relative_to: Option<RelativeTo<'_, C, Z>>,
    date: &DateDuration,
) -> TemporalResult<i128> {
    // 1. If relativeTo does not have an [[InitializedTemporalZonedDateTime]] internal slot, return 0.
    let Some(zdt) = relative_to.and_then(RelativeTo::as_zoned_date_time) else {
        return Ok(0);
    };
    // 2. Let instant be ! CreateTemporalInstant(relativeTo.[[Nanoseconds]]).
    // 3. Let offsetBefore be ? GetOffsetNanosecondsFor(relativeTo.[[TimeZone]], instant).
    let offset_before = zdt.offset_nanoseconds()?;
    // 4. Let after be ? AddZonedDateTime(relativeTo.[[Nanoseconds]], relativeTo.[[TimeZone]], relativeTo.[[Calendar]], y, mon, w, d, 0, 0, 0, 0, 0, 0).
    let after = zdt.add_as_instant(
        &Duration::from_date_duration(date),
        ArithmeticOverflow::Constrain,
    )?;
    // 5-6. Let offsetAfter be ? GetOffsetNanosecondsFor(relativeTo.[[TimeZone]], instantAfter).
    let offset_after = zdt.tz().get_offset_nanos_for(after)?;
    // 7. Return offsetBefore - offsetAfter.
    Ok(offset_before - offset_after)
}

/// `AddDuration`
pub(crate) fn add_duration<C: CalendarProtocol, Z: TzProtocol>(
    one: &Duration,
    two: &Duration,
    relative_to: Option<RelativeTo<'_, C, Z>>,
) -> TemporalResult<Duration> {
    // 1. Let largestUnit1 be ! DefaultTemporalLargestUnit(y1, mon1, w1, d1, h1, min1, s1, ms1, mus1).
    // 2. Let largestUnit2 be ! DefaultTemporalLargestUnit(y2, mon2, w2, d2, h2, min2, s2, ms2, mus2).
    // 3. Let largestUnit be ! LargerOfTwoTemporalUnits(largestUnit1, largestUnit2).
    let largest_unit = one.default_largest_unit().max(two.default_largest_unit());

    let summed_time = TimeDuration::new_unchecked(
        one.hours() + two.hours(),
        one.minutes() + two.minutes(),
        one.seconds() + two.seconds(),
        one.milliseconds() + two.milliseconds(),
        one.microseconds() + two.microseconds(),
        one.nanoseconds() + two.nanoseconds(),
    );

    match relative_to {
        // 4. If relativeTo is undefined, then
        None => {
            // a. If largestUnit is one of "year", "month", or "week", then
            if largest_unit.is_calendar_unit() {
                // i. Throw a RangeError exception.
                return Err(TemporalError::range()
                    .with_message("relativeTo is required to add durations with calendar units."));
            }
            // b. Let result be ? BalanceDuration(d1 + d2, h1 + h2, min1 + min2, s1 + s2, ms1 + ms2, mus1 + mus2, ns1 + ns2, largestUnit).
            let (days, time) =
                TimeDuration::balance(one.days() + two.days(), &summed_time, largest_unit)?;
            // c. Return ! CreateDurationRecord(0, 0, 0, result.[[Days]], result.[[Hours]], ...).
            Duration::from_parts(&DateDuration::new_unchecked(0.0, 0.0, 0.0, days), &time)
        }
        // 5. If relativeTo has an [[InitializedTemporalDate]] internal slot, then
        Some(RelativeTo::PlainDate(plain_date)) => {
            // e. Let intermediate be ? CalendarDateAdd(calendar, relativeTo, dateDuration1, undefined, dateAdd).
            let intermediate = plain_date.add_date(one.date(), ArithmeticOverflow::Constrain)?;
            // f. Let end be ? CalendarDateAdd(calendar, intermediate, dateDuration2, undefined, dateAdd).
            let end = intermediate.add_date(two.date(), ArithmeticOverflow::Constrain)?;
            // g. Let dateLargestUnit be ! LargerOfTwoTemporalUnits("day", largestUnit).
            let date_largest_unit = largest_unit.max(TemporalUnit::Day);
            // h-i. Let dateDifference be ? CalendarDateUntil(calendar, relativeTo, end, differenceOptions).
            let date_difference = plain_date.until_date(&end, date_largest_unit)?;
            // j. Let result be ? BalanceDuration(dateDifference.[[Days]], h1 + h2, min1 + min2, s1 + s2, ms1 + ms2, mus1 + mus2, ns1 + ns2, largestUnit).
            let (days, time) =
                TimeDuration::balance(date_difference.days, &summed_time, largest_unit)?;
            // k. Return ? CreateDurationRecord(dateDifference.[[Years]], dateDifference.[[Months]], dateDifference.[[Weeks]], result.[[Days]], ...).
            Duration::from_parts(
                &DateDuration::new_unchecked(
                    date_difference.years,
                    date_difference.months,
                    date_difference.weeks,
                    days,
                ),
                &time,
            )
        }
        // 6. Assert: relativeTo has an [[InitializedTemporalZonedDateTime]] internal slot.
        Some(RelativeTo::ZonedDateTime(zdt)) => {
            // b. Let intermediateNs be ? AddZonedDateTime(relativeTo.[[Nanoseconds]], timeZone, calendar, y1, mon1, w1, d1, h1, min1, s1, ms1, mus1, ns1).
            let intermediate_ns = zdt.add_as_instant(one, ArithmeticOverflow::Constrain)?;
            // c. Let endNs be ? AddZonedDateTime(intermediateNs, timeZone, calendar, y2, mon2, w2, d2, h2, min2, s2, ms2, mus2, ns2).
            let end_ns = zdt
                .with_epoch_nanos(intermediate_ns)?
                .add_as_instant(two, ArithmeticOverflow::Constrain)?;

            // d. If largestUnit is not one of "year", "month", "week", or "day", then
            if !largest_unit.is_date_unit() {
                // i. Let diffNs be ! DifferenceInstant(relativeTo.[[Nanoseconds]], endNs, 1, "nanosecond", "halfExpand").
                let diff =
                    NormalizedTimeDuration::from_nanosecond_difference(end_ns, zdt.epoch_nanoseconds());
                // ii. Let result be ? BalanceDuration(0, 0, 0, 0, 0, 0, diffNs, largestUnit).
                let (_, time) = TimeDuration::from_normalized(0.0, &diff, largest_unit)?;
                // iii. Return ! CreateDurationRecord(0, 0, 0, 0, result.[[Hours]], ...).
                return Duration::from_parts(&DateDuration::default(), &time);
            }

            // e. Return ? DifferenceZonedDateTime(relativeTo.[[Nanoseconds]], endNs, timeZone, calendar, largestUnit).
            difference_zoned_date_time(zdt, end_ns, largest_unit)
        }
    }
}

/// `DifferenceZonedDateTime`, returning the full duration between `zdt` and `end_ns`.
fn difference_zoned_date_time<C: CalendarProtocol, Z: TzProtocol>(
    zdt: &crate::components::ZonedDateTime<C, Z>,
    end_ns: i128,
    largest_unit: TemporalUnit,
) -> TemporalResult<Duration> {
    // 1-9. Let dateDifference and timeRemainderNs be the calendar difference and the exact remainder.
    let (date, remainder) = zdt.diff_zoned_date_time(end_ns, largest_unit)?;
    // 10. Let intermediate be ! CreateTemporalZonedDateTime(intermediateNs, timeZone, calendar).
    let intermediate = zdt.with_epoch_nanos(end_ns - remainder.to_i128()?)?;
    // 11. Let result be ? NanosecondsToDays(timeRemainderNs, intermediate).
    let result = remainder.to_days_zoned(&intermediate)?;
    // 12. Let timeDifference be ! BalanceDuration(0, 0, 0, 0, 0, 0, result.[[Nanoseconds]], "hour").
    let (_, time) = TimeDuration::from_normalized(0.0, &result.remainder, TemporalUnit::Hour)?;
    // 13. Return ! CreateDurationRecord(dateDifference.[[Years]], dateDifference.[[Months]], dateDifference.[[Weeks]], result.[[Days]], ...).
    Duration::from_parts(
        &DateDuration::new_unchecked(date.years, date.months, date.weeks, result.days),
        &time,
    )
}

/// `RoundDuration`
pub(crate) fn round_duration<C: CalendarProtocol, Z: TzProtocol>(
    duration: &Duration,
    increment: RoundingIncrement,
    unit: TemporalUnit,
    rounding_mode: RoundingMode,
    relative_to: Option<RelativeTo<'_, C, Z>>,
) -> TemporalResult<RoundedDuration> {
    if unit == TemporalUnit::Auto {
        return Err(TemporalError::range().with_message("Invalid TemporalUnit for RoundDuration."));
    }
    if let Some(max) = unit.to_maximum_rounding_increment() {
        increment.validate(max.into(), false)?;
    }

    // 2. If unit is "year", "month", or "week", and relativeTo is undefined, then
    if unit.is_calendar_unit() && relative_to.is_none() {
        // a. Throw a RangeError exception.
        return Err(TemporalError::range()
            .with_message("relativeTo is required to round to calendar units."));
    }

    // 3-4. Let zonedRelativeTo be relativeTo if it is zoned, and set relativeTo to its plain date.
    let zoned_relative_to = relative_to.and_then(RelativeTo::as_zoned_date_time);
    let plain_relative_to = relative_to.map(|r| r.to_plain_date()).transpose()?;

    let (mut years, mut months, mut weeks, mut days) = (
        duration.years(),
        duration.months(),
        duration.weeks(),
        duration.days(),
    );
    let increment_value = f64::from(increment.get());

    // 5. If unit is one of "year", "month", "week", or "day", then
    if unit.is_date_unit() {
        // a. Let nanoseconds be ! TotalDurationNanoseconds(0, hours, minutes, seconds, milliseconds, microseconds, nanoseconds, 0).
        let nanoseconds = NormalizedTimeDuration::from_time_duration(duration.time())?;

        // b-d. Let result be ? NanosecondsToDays(nanoseconds, intermediate).
        let result = match zoned_relative_to {
            // c. If zonedRelativeTo is not undefined, then
            Some(zdt) => {
                // i. Let intermediate be ? MoveRelativeZonedDateTime(zonedRelativeTo, years, months, weeks, days).
                let intermediate = zdt.move_relative(duration.date())?;
                nanoseconds.to_days_zoned(&intermediate)?
            }
            None => nanoseconds.to_days()?,
        };
        temporal_assert!(
            result.day_length > 0,
            "day length must be positive: {}",
            result.day_length
        );
        let day_length = u64::try_from(result.day_length)
            .map_err(|_| TemporalError::range().with_message("Invalid day length."))?;

        // e. Set days to days + result.[[Days]] + result.[[Nanoseconds]] / result.[[DayLength]].
        days += result.days + result.remainder.divide(day_length);

        // f. Set hours, minutes, seconds, milliseconds, microseconds, and nanoseconds to 0.
        let remainder;
        match unit {
            // 9. If unit is "year", then
            TemporalUnit::Year => {
                let relative = plain_relative_to.temporal_unwrap()?;
                // a-c. Let yearsLater be ? AddDate(calendar, relativeTo, yearsDuration, undefined, dateAdd).
                let years_later = relative.add_date(
                    &DateDuration::new_unchecked(years, 0.0, 0.0, 0.0),
                    ArithmeticOverflow::Constrain,
                )?;
                // d-e. Let yearsMonthsWeeksLater be ? AddDate(calendar, relativeTo, yearsMonthsWeeks, undefined, dateAdd).
                let years_months_weeks_later = relative.add_date(
                    &DateDuration::new_unchecked(years, months, weeks, 0.0),
                    ArithmeticOverflow::Constrain,
                )?;
                // f. Let monthsWeeksInDays be DaysUntil(yearsLater, yearsMonthsWeeksLater).
                let months_weeks_in_days = years_later.days_until(&years_months_weeks_later)?;
                // g. Set relativeTo to yearsLater.
                let relative = years_later;
                // h. Let days be days + monthsWeeksInDays.
                days += months_weeks_in_days;

                // i-j. Let wholeDaysLater be ? CalendarDateAdd(calendar, relativeTo, wholeDaysDuration, undefined, dateAdd).
                let whole_days_later = relative.add_date(
                    &DateDuration::new_unchecked(0.0, 0.0, 0.0, days.trunc()),
                    ArithmeticOverflow::Constrain,
                )?;
                // k-m. Let timePassed be ? CalendarDateUntil(calendar, relativeTo, wholeDaysLater, untilOptions).
                let time_passed = relative.until_date(&whole_days_later, TemporalUnit::Year)?;
                // n. Let yearsPassed be timePassed.[[Years]].
                let years_passed = time_passed.years;
                // o. Set years to years + yearsPassed.
                years += years_passed;

                // p-r. Set relativeTo to ? CalendarDateAdd(calendar, relativeTo, yearsDuration, undefined, dateAdd).
                let old_relative = relative;
                let relative = old_relative.add_date(
                    &DateDuration::new_unchecked(years_passed, 0.0, 0.0, 0.0),
                    ArithmeticOverflow::Constrain,
                )?;
                // s. Let daysPassed be DaysUntil(oldRelativeTo, relativeTo).
                let days_passed = old_relative.days_until(&relative)?;
                // t. Set days to days - daysPassed.
                days -= days_passed;

                // u. If days < 0, let sign be -1; else, let sign be 1.
                let sign = if days < 0.0 { -1.0 } else { 1.0 };
                // v-x. Let oneYearDays be moveResult.[[Days]].
                let (_, one_year_days) = relative
                    .move_relative_date(&DateDuration::new_unchecked(sign, 0.0, 0.0, 0.0))?;
                temporal_assert!(one_year_days != 0.0, "a year must contain days");

                // y. Let fractionalYears be years + days / abs(oneYearDays).
                let fractional_years = years + days / one_year_days.abs();
                // z. Set years to RoundNumberToIncrement(fractionalYears, increment, roundingMode).
                years = IncrementRounder::<f64>::from_signed_num(fractional_years, increment_value)
                    .round(rounding_mode);
                // aa. Set remainder to fractionalYears - years.
                remainder = fractional_years - years;
                // ab. Set months, weeks, and days to 0.
                months = 0.0;
                weeks = 0.0;
                days = 0.0;
            }
            // 10. Else if unit is "month", then
            TemporalUnit::Month => {
                let relative = plain_relative_to.temporal_unwrap()?;
                // a-c. Let yearsMonthsLater be ? AddDate(calendar, relativeTo, yearsMonths, undefined, dateAdd).
                let years_months_later = relative.add_date(
                    &DateDuration::new_unchecked(years, months, 0.0, 0.0),
                    ArithmeticOverflow::Constrain,
                )?;
                // d-e. Let yearsMonthsWeeksLater be ? AddDate(calendar, relativeTo, yearsMonthsWeeks, undefined, dateAdd).
                let years_months_weeks_later = relative.add_date(
                    &DateDuration::new_unchecked(years, months, weeks, 0.0),
                    ArithmeticOverflow::Constrain,
                )?;
                // f. Let weeksInDays be DaysUntil(yearsMonthsLater, yearsMonthsWeeksLater).
                let weeks_in_days = years_months_later.days_until(&years_months_weeks_later)?;
                // h. Let days be days + weeksInDays.
                days += weeks_in_days;

                // i. If days < 0, let sign be -1; else, let sign be 1.
                let sign = if days < 0.0 { -1.0 } else { 1.0 };
                // j. Let oneMonth be ! CreateTemporalDuration(0, sign, 0, 0, 0, 0, 0, 0, 0, 0).
                let one_month = DateDuration::new_unchecked(0.0, sign, 0.0, 0.0);
                // g, k-m. Let moveResult be ? MoveRelativeDate(calendar, yearsMonthsLater, oneMonth).
                let (mut relative, mut one_month_days) =
                    years_months_later.move_relative_date(&one_month)?;

                // n. Repeat, while abs(days) ≥ abs(oneMonthDays),
                while days.abs() >= one_month_days.abs() {
                    // i. Set months to months + sign.
                    months += sign;
                    // ii. Set days to days - oneMonthDays.
                    days -= one_month_days;
                    // iii-v. Set moveResult to ? MoveRelativeDate(calendar, relativeTo, oneMonth).
                    (relative, one_month_days) = relative.move_relative_date(&one_month)?;
                }
                temporal_assert!(one_month_days != 0.0, "a month must contain days");

                // o. Let fractionalMonths be months + days / abs(oneMonthDays).
                let fractional_months = months + days / one_month_days.abs();
                // p. Set months to RoundNumberToIncrement(fractionalMonths, increment, roundingMode).
                months = IncrementRounder::<f64>::from_signed_num(fractional_months, increment_value)
                    .round(rounding_mode);
                // q. Set remainder to fractionalMonths - months.
                remainder = fractional_months - months;
                // r. Set weeks and days to 0.
                weeks = 0.0;
                days = 0.0;
            }
            // 11. Else if unit is "week", then
            TemporalUnit::Week => {
                let relative = plain_relative_to.temporal_unwrap()?;
                // a. If days < 0, let sign be -1; else, let sign be 1.
                let sign = if days < 0.0 { -1.0 } else { 1.0 };
                // b. Let oneWeek be ! CreateTemporalDuration(0, 0, sign, 0, 0, 0, 0, 0, 0, 0).
                let one_week = DateDuration::new_unchecked(0.0, 0.0, sign, 0.0);
                // c-e. Let moveResult be ? MoveRelativeDate(calendar, relativeTo, oneWeek).
                let (mut relative, mut one_week_days) = relative.move_relative_date(&one_week)?;

                // f. Repeat, while abs(days) ≥ abs(oneWeekDays),
                while days.abs() >= one_week_days.abs() {
                    // i. Set weeks to weeks + sign.
                    weeks += sign;
                    // ii. Set days to days - oneWeekDays.
                    days -= one_week_days;
                    // iii-v. Set moveResult to ? MoveRelativeDate(calendar, relativeTo, oneWeek).
                    (relative, one_week_days) = relative.move_relative_date(&one_week)?;
                }
                temporal_assert!(one_week_days != 0.0, "a week must contain days");

                // g. Let fractionalWeeks be weeks + days / abs(oneWeekDays).
                let fractional_weeks = weeks + days / one_week_days.abs();
                // h. Set weeks to RoundNumberToIncrement(fractionalWeeks, increment, roundingMode).
                weeks = IncrementRounder::<f64>::from_signed_num(fractional_weeks, increment_value)
                    .round(rounding_mode);
                // i. Set remainder to fractionalWeeks - weeks.
                remainder = fractional_weeks - weeks;
                // j. Set days to 0.
                days = 0.0;
            }
            // 12. Else if unit is "day", then
            _ => {
                // a. Let fractionalDays be days.
                let fractional_days = days;
                // b. Set days to RoundNumberToIncrement(days, increment, roundingMode).
                days = IncrementRounder::<f64>::from_signed_num(fractional_days, increment_value)
                    .round(rounding_mode);
                // c. Set remainder to fractionalDays - days.
                remainder = fractional_days - days;
            }
        }

        // 19. Let duration be ? CreateDurationRecord(years, months, weeks, days, 0, 0, 0, 0, 0, 0).
        let duration = Duration::from_parts(
            &DateDuration::new_unchecked(years, months, weeks, days),
            &TimeDuration::default(),
        )?;
        // 20. Return the Record { [[DurationRecord]]: duration, [[Remainder]]: remainder }.
        return Ok(RoundedDuration {
            duration,
            remainder,
        });
    }

    // 13-18. Round the time units, keeping the fields coarser than unit.
    let unit_ns = unit.as_nanoseconds().temporal_unwrap()?;
    let fields = duration.time().fields();
    // Index of the unit in the time fields, `hours` being 0.
    let index = TemporalUnit::Hour as usize - unit as usize;

    let mut finer = [0f64; 6];
    finer[index..].copy_from_slice(&fields[index..]);
    let total = NormalizedTimeDuration::from_time_duration(&TimeDuration::new_unchecked(
        finer[0], finer[1], finer[2], finer[3], finer[4], finer[5],
    ))?;

    let rounded = total.round(unit_ns * u64::from(increment.get()), rounding_mode);
    let remainder = NormalizedTimeDuration(&total.0 - &rounded.0).divide(unit_ns);

    let mut time = fields;
    time[index] = rounded.divide(unit_ns);
    time[index + 1..].iter_mut().for_each(|v| *v = 0.0);

    let duration = Duration::from_parts(
        duration.date(),
        &TimeDuration::new_unchecked(time[0], time[1], time[2], time[3], time[4], time[5]),
    )?;
    Ok(RoundedDuration {
        duration,
        remainder,
    })
}

/// `AdjustRoundedDurationDays`
///
/// After rounding a duration with a zoned anchor to a unit below days, folds any
/// time that now spans the full length of the following day into the days field.
pub(crate) fn adjust_rounded_duration_days<C: CalendarProtocol, Z: TzProtocol>(
    duration: &Duration,
    increment: RoundingIncrement,
    unit: TemporalUnit,
    rounding_mode: RoundingMode,
    relative_to: Option<RelativeTo<'_, C, Z>>,
) -> TemporalResult<Duration> {
    // 1. If relativeTo does not have an [[InitializedTemporalZonedDateTime]] internal slot; or unit is one of
    // "year", "month", "week", or "day"; or unit is "nanosecond" and increment is 1, then
    let Some(zdt) = relative_to.and_then(RelativeTo::as_zoned_date_time) else {
        return Ok(*duration);
    };
    if unit.is_date_unit() || (unit == TemporalUnit::Nanosecond && increment == RoundingIncrement::ONE)
    {
        // a. Return ! CreateDurationRecord(years, months, weeks, days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds).
        return Ok(*duration);
    }

    // 2. Let timeRemainderNs be ! TotalDurationNanoseconds(0, hours, minutes, seconds, milliseconds, microseconds, nanoseconds, 0).
    let time_remainder = NormalizedTimeDuration::from_time_duration(duration.time())?;
    // 3. Let direction be ! ℝ(Sign(𝔽(timeRemainderNs))).
    let direction = time_remainder.sign();
    if direction == Sign::Zero {
        return Ok(*duration);
    }
    let one_day = DateDuration::new_unchecked(0.0, 0.0, 0.0, f64::from(direction as i8));

    // 4. Let dayStart be ? AddZonedDateTime(relativeTo.[[Nanoseconds]], relativeTo.[[TimeZone]], relativeTo.[[Calendar]], years, months, weeks, days, 0, 0, 0, 0, 0, 0).
    let day_start = zdt.add_as_instant(
        &Duration::from_date_duration(duration.date()),
        ArithmeticOverflow::Constrain,
    )?;
    // 5. Let dayEnd be ? AddZonedDateTime(dayStart, relativeTo.[[TimeZone]], relativeTo.[[Calendar]], 0, 0, 0, direction, 0, 0, 0, 0, 0, 0).
    let day_end = zdt
        .with_epoch_nanos(day_start)?
        .add_as_instant(&Duration::from_date_duration(&one_day), ArithmeticOverflow::Constrain)?;
    // 6. Let dayLengthNs be ℝ(dayEnd - dayStart).
    let day_length = NormalizedTimeDuration::from_nanosecond_difference(day_end, day_start);

    // 7. If (timeRemainderNs - dayLengthNs) × direction < 0, then
    let beyond_day = NormalizedTimeDuration(&time_remainder.0 - &day_length.0);
    if (beyond_day.sign() as i8) * (direction as i8) < 0 {
        // a. Return ! CreateDurationRecord(years, months, weeks, days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds).
        return Ok(*duration);
    }

    // 8. Set timeRemainderNs to ! RoundTemporalInstant(𝔽(timeRemainderNs - dayLengthNs), increment, unit, roundingMode).
    let unit_ns = unit.as_nanoseconds().temporal_unwrap()?;
    let time_remainder = beyond_day.round(unit_ns * u64::from(increment.get()), rounding_mode);

    // 9. Let adjustedDateDuration be ? AddDuration(years, months, weeks, days, 0, 0, 0, 0, 0, 0, 0, 0, 0, direction, 0, 0, 0, 0, 0, 0, relativeTo).
    let adjusted_date = add_duration(
        &Duration::from_date_duration(duration.date()),
        &Duration::from_date_duration(&one_day),
        relative_to,
    )?;
    // 10. Let adjustedTimeDuration be ? BalanceDuration(0, 0, 0, 0, 0, 0, timeRemainderNs, "hour").
    let (_, adjusted_time) =
        TimeDuration::from_normalized(0.0, &time_remainder, TemporalUnit::Hour)?;

    // 11. Return ! CreateDurationRecord(adjustedDateDuration.[[Years]], ..., adjustedTimeDuration.[[Nanoseconds]]).
    Duration::from_parts(adjusted_date.date(), &adjusted_time)
}

/// Builds the canonical text form of `duration`.
pub(crate) fn duration_to_formattable(
    duration: &Duration,
    precision: Precision,
) -> TemporalResult<FormattableDuration> {
    let sign = duration.sign();
    let duration = duration.abs();

    let date = if duration.date().is_zero() {
        None
    } else {
        Some(FormattableDateDuration {
            years: field_to_u64(duration.years())?,
            months: field_to_u64(duration.months())?,
            weeks: field_to_u64(duration.weeks())?,
            days: field_to_u64(duration.days())?,
        })
    };

    // Fold the sub-second fields into the seconds.
    let subsecond_total = NormalizedTimeDuration::from_time_duration(&TimeDuration::new_unchecked(
        0.0,
        0.0,
        duration.seconds(),
        duration.milliseconds(),
        duration.microseconds(),
        duration.nanoseconds(),
    ))?;

    Ok(FormattableDuration {
        precision,
        sign,
        date,
        time: FormattableTimeDuration {
            hours: field_to_u64(duration.hours())?,
            minutes: field_to_u64(duration.minutes())?,
            seconds: subsecond_total.seconds()?,
            subseconds: subsecond_total.subseconds()?,
        },
    })
}

#[inline]
fn field_to_u64(value: f64) -> TemporalResult<u64> {
    let value = FiniteF64::to_integer_without_rounding(value)?;
    u64::from_f64(value.as_inner())
        .ok_or(TemporalError::range().with_message("Duration field exceeded a valid range."))
}

/// `IsValidDuration`
///
/// Utility function to check whether the `Duration` fields are valid.
#[inline]
#[must_use]
pub(crate) fn is_valid_duration(set: &[f64]) -> bool {
    // 1. Let sign be ! DurationSign(years, months, weeks, days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds).
    let sign = duration_sign(set);
    // 2. For each value v of « years, months, weeks, days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds », do
    for v in set {
        // a. If 𝔽(v) is not finite, return false.
        if !v.is_finite() {
            return false;
        }
        // b. If v < 0 and sign > 0, return false.
        if *v < 0f64 && sign == Sign::Positive {
            return false;
        }
        // c. If v > 0 and sign < 0, return false.
        if *v > 0f64 && sign == Sign::Negative {
            return false;
        }
        if v.abs() > MAX_SAFE_INTEGER {
            return false;
        }
    }
    // 3. Return true.
    true
}

/// Returns whether every field holds an integral value.
///
/// Fields only carry a fraction while a rounding remainder is being computed,
/// never in a constructed record.
#[inline]
#[must_use]
pub(crate) fn is_integral_duration(set: &[f64]) -> bool {
    set.iter().all(|v| v.fract() == 0.0)
}

/// Utility function for determining the sign for the current set of `Duration` fields.
///
/// Equivalent: 7.5.10 `DurationSign ( years, months, weeks, days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds )`
#[inline]
#[must_use]
pub(crate) fn duration_sign(set: &[f64]) -> Sign {
    // 1. For each value v of « years, months, weeks, days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds », do
    for v in set {
        // a. If v < 0, return -1.
        if *v < 0f64 {
            return Sign::Negative;
        // b. If v > 0, return 1.
        } else if *v > 0f64 {
            return Sign::Positive;
        }
    }
    // 2. Return 0.
    Sign::Zero
}

impl From<TimeDuration> for Duration {
    fn from(value: TimeDuration) -> Self {
        Self {
            time: value,
            date: DateDuration::default(),
        }
    }
}

impl From<DateDuration> for Duration {
    fn from(value: DateDuration) -> Self {
        Self {
            date: value,
            time: TimeDuration::default(),
        }
    }
}

// ==== FromStr trait impl ====

impl FromStr for Duration {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_record = IsoDurationParser::from_str(s)
            .parse()
            .map_err(|e| TemporalError::range().with_message(format!("{e}")))?;

        let (hours, minutes, seconds, millis, micros, nanos) = match parse_record.time {
            Some(TimeDurationRecord::Hours { hours, fraction }) => {
                let fraction_ns = u64::from(fraction.and_then(|x| x.to_nanoseconds()).unwrap_or(0));
                // The fraction of an hour, in nanoseconds.
                let fractional_hours_ns = fraction_ns * 3600;
                let (seconds, subseconds) = split_seconds(fractional_hours_ns);
                (
                    hours as f64,
                    (seconds / 60) as f64,
                    (seconds % 60) as f64,
                    subseconds.0,
                    subseconds.1,
                    subseconds.2,
                )
            }
            Some(TimeDurationRecord::Minutes {
                hours,
                minutes,
                fraction,
            }) => {
                let fraction_ns = u64::from(fraction.and_then(|x| x.to_nanoseconds()).unwrap_or(0));
                // The fraction of a minute, in nanoseconds.
                let (seconds, subseconds) = split_seconds(fraction_ns * 60);
                (
                    hours as f64,
                    minutes as f64,
                    seconds as f64,
                    subseconds.0,
                    subseconds.1,
                    subseconds.2,
                )
            }
            Some(TimeDurationRecord::Seconds {
                hours,
                minutes,
                seconds,
                fraction,
            }) => {
                let fraction_ns = u64::from(fraction.and_then(|x| x.to_nanoseconds()).unwrap_or(0));
                let (_, subseconds) = split_seconds(fraction_ns);
                (
                    hours as f64,
                    minutes as f64,
                    seconds as f64,
                    subseconds.0,
                    subseconds.1,
                    subseconds.2,
                )
            }
            None => (0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        };

        let (years, months, weeks, days) = if let Some(date) = parse_record.date {
            (date.years, date.months, date.weeks, date.days)
        } else {
            (0, 0, 0, 0)
        };

        let sign = f64::from(parse_record.sign as i8);

        Self::new(
            FiniteF64::from(years).copysign(sign).as_inner(),
            FiniteF64::from(months).copysign(sign).as_inner(),
            FiniteF64::from(weeks).copysign(sign).as_inner(),
            FiniteF64::try_from(days)?.copysign(sign).as_inner(),
            FiniteF64::try_from(hours)?.copysign(sign).as_inner(),
            FiniteF64::try_from(minutes)?.copysign(sign).as_inner(),
            FiniteF64::try_from(seconds)?.copysign(sign).as_inner(),
            FiniteF64::try_from(millis)?.copysign(sign).as_inner(),
            FiniteF64::try_from(micros)?.copysign(sign).as_inner(),
            FiniteF64::try_from(nanos)?.copysign(sign).as_inner(),
        )
    }
}

/// Splits a nanosecond value into whole seconds and the millisecond,
/// microsecond, and nanosecond remainder.
#[inline]
fn split_seconds(nanoseconds: u64) -> (u64, (f64, f64, f64)) {
    let seconds = nanoseconds / 1_000_000_000;
    let subseconds = nanoseconds % 1_000_000_000;
    (
        seconds,
        (
            (subseconds / 1_000_000) as f64,
            (subseconds % 1_000_000 / 1_000) as f64,
            (subseconds % 1_000) as f64,
        ),
    )
}
