//! This module implements `ZonedDateTime`, the zoned instant anchor.

use crate::{
    components::{
        calendar::CalendarProtocol,
        duration::{normalized::NormalizedTimeDuration, DateDuration, Duration},
        tz::TzProtocol,
        PlainDate,
    },
    iso::{IsoDate, IsoDateTime},
    options::{ArithmeticOverflow, Disambiguation, TemporalUnit},
    TemporalError, TemporalResult, NS_MAX_INSTANT, NS_MIN_INSTANT,
};

/// An exact instant viewed through a time zone and calendar.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonedDateTime<C: CalendarProtocol, Z: TzProtocol> {
    epoch_nanos: i128,
    calendar: C,
    tz: Z,
}

// ==== Private API ====

impl<C: CalendarProtocol, Z: TzProtocol> ZonedDateTime<C, Z> {
    /// Creates a `ZonedDateTime` without validating the epoch nanoseconds.
    #[inline]
    pub(crate) fn new_unchecked(epoch_nanos: i128, calendar: C, tz: Z) -> Self {
        Self {
            epoch_nanos,
            calendar,
            tz,
        }
    }

    /// Returns a new `ZonedDateTime` at `epoch_nanos` in this zone and calendar.
    pub(crate) fn with_epoch_nanos(&self, epoch_nanos: i128) -> TemporalResult<Self> {
        Self::try_new(epoch_nanos, self.calendar.clone(), self.tz.clone())
    }

    /// `AddZonedDateTime`
    ///
    /// Adds a duration to this instant, resolving the date portion in the wall-clock
    /// of this zone, and returns the resulting epoch nanoseconds.
    pub(crate) fn add_as_instant(
        &self,
        duration: &Duration,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<i128> {
        // 1. If all of years, months, weeks, and days are 0, then
        let start = if duration.date().is_zero() {
            // a. Return ? AddInstant(epochNanoseconds, hours, minutes, seconds, milliseconds, microseconds, nanoseconds).
            self.epoch_nanos
        } else {
            // 2. Let temporalDateTime be ? GetPlainDateTimeFor(timeZone, instant, calendar).
            let dt = self.to_iso_datetime()?;
            // 3-5. Let addedDate be ? CalendarDateAdd(calendar, datePart, dateDuration, options).
            let added = self.calendar.date_add(&dt.date, duration.date(), overflow)?;
            // 6. Let intermediateDateTime be ? CreateTemporalDateTime(addedDate, temporalDateTime's time).
            let intermediate = IsoDateTime::new_unchecked(added, dt.time);
            if !intermediate.is_within_limits() {
                return Err(
                    TemporalError::range().with_message("Date-time is outside valid limits.")
                );
            }
            // 7. Let intermediateInstant be ? GetInstantFor(timeZone, intermediateDateTime, "compatible").
            self.tz
                .get_epoch_nanoseconds_for(&intermediate, Disambiguation::Compatible)?
        };

        // 8. Return ? AddInstant(intermediateInstant.[[Nanoseconds]], hours, minutes, seconds, milliseconds, microseconds, nanoseconds).
        add_instant(
            start,
            &NormalizedTimeDuration::from_time_duration(duration.time())?,
        )
    }

    /// `MoveRelativeZonedDateTime`
    pub(crate) fn move_relative(&self, date: &DateDuration) -> TemporalResult<Self> {
        let epoch_nanos = self.add_as_instant(
            &Duration::from_date_duration(date),
            ArithmeticOverflow::Constrain,
        )?;
        self.with_epoch_nanos(epoch_nanos)
    }

    /// `DifferenceZonedDateTime`
    ///
    /// Returns the calendar portion of the difference between this instant and
    /// `other_ns` along with the remaining exact time.
    pub(crate) fn diff_zoned_date_time(
        &self,
        other_ns: i128,
        largest_unit: TemporalUnit,
    ) -> TemporalResult<(DateDuration, NormalizedTimeDuration)> {
        // 1. If ns1 is ns2, return zero.
        if self.epoch_nanos == other_ns {
            return Ok((DateDuration::default(), NormalizedTimeDuration::default()));
        }
        // 2-3. Let start/endDateTime be ? GetPlainDateTimeFor(timeZone, instant, calendar).
        let start = self.to_iso_datetime()?;
        let end = self.tz.get_iso_datetime_for(other_ns)?;
        // 4. Let dateDifference be ? DifferenceISODateTime(start, end, calendar, largestUnit).
        let date_diff = self.diff_iso_date_time(&start, &end, largest_unit)?;
        // 5. Let intermediateNs be ? AddZonedDateTime(ns1, timeZone, calendar, years, months, weeks, 0, 0, 0, 0, 0, 0, 0).
        let intermediate = self.add_as_instant(
            &Duration::from_date_duration(&DateDuration::new_unchecked(
                date_diff.years,
                date_diff.months,
                date_diff.weeks,
                0.0,
            )),
            ArithmeticOverflow::Constrain,
        )?;
        // 6. Let timeRemainderNs be ns2 - intermediateNs.
        let remainder = NormalizedTimeDuration::from_nanosecond_difference(other_ns, intermediate);
        Ok((
            DateDuration::new_unchecked(date_diff.years, date_diff.months, date_diff.weeks, 0.0),
            remainder,
        ))
    }

    /// `DifferenceISODateTime`
    ///
    /// Only the date portion of the difference is returned, with the start date
    /// adjusted when the time of day would otherwise borrow a day.
    pub(crate) fn diff_iso_date_time(
        &self,
        start: &IsoDateTime,
        end: &IsoDateTime,
        largest_unit: TemporalUnit,
    ) -> TemporalResult<DateDuration> {
        // 1. Let timeDifference be ! DifferenceTime(h1, min1, s1, ms1, mus1, ns1, h2, min2, s2, ms2, mus2, ns2).
        let time_diff = end.time.as_nanoseconds() - start.time.as_nanoseconds();
        // 2. Let timeSign be ! DurationSign(0, 0, 0, 0, timeDifference...).
        let time_sign = time_diff.signum();
        // 3. Let dateSign be ! CompareISODate(y2, mon2, d2, y1, mon1, d1).
        let date_sign = end.date.cmp(&start.date) as i64;
        // 4-5. If timeSign is -dateSign, adjust the start date by one day.
        let adjusted_start = if time_sign == -date_sign && time_sign != 0 {
            IsoDate::from_epoch_days(start.date.to_epoch_days() - time_sign)?
        } else {
            start.date
        };
        // 6-9. Let dateDifference be ? CalendarDateUntil(calendar, date1, date2, untilOptions).
        self.calendar.date_until(
            &adjusted_start,
            &end.date,
            largest_unit.max(TemporalUnit::Day),
        )
    }
}

// ==== Public API ====

impl<C: CalendarProtocol, Z: TzProtocol> ZonedDateTime<C, Z> {
    /// Creates a new `ZonedDateTime`, validating that the instant is within range.
    pub fn try_new(epoch_nanos: i128, calendar: C, tz: Z) -> TemporalResult<Self> {
        if !(NS_MIN_INSTANT..=NS_MAX_INSTANT).contains(&epoch_nanos) {
            return Err(TemporalError::range().with_message("Instant is outside valid limits."));
        }
        Ok(Self::new_unchecked(epoch_nanos, calendar, tz))
    }

    /// Returns the epoch nanoseconds of this instant.
    #[inline]
    #[must_use]
    pub fn epoch_nanoseconds(&self) -> i128 {
        self.epoch_nanos
    }

    /// Returns a reference to the calendar.
    #[inline]
    #[must_use]
    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// Returns a reference to the time zone.
    #[inline]
    #[must_use]
    pub fn tz(&self) -> &Z {
        &self.tz
    }

    /// Returns the UTC offset in nanoseconds at this instant.
    pub fn offset_nanoseconds(&self) -> TemporalResult<i128> {
        self.tz.get_offset_nanos_for(self.epoch_nanos)
    }

    /// Returns the wall-clock date-time of this instant.
    pub fn to_iso_datetime(&self) -> TemporalResult<IsoDateTime> {
        self.tz.get_iso_datetime_for(self.epoch_nanos)
    }

    /// Returns the wall-clock date of this instant as a `PlainDate`.
    pub fn to_plain_date(&self) -> TemporalResult<PlainDate<C>> {
        let dt = self.to_iso_datetime()?;
        Ok(PlainDate::new_unchecked(dt.date, self.calendar.clone()))
    }
}

/// `AddInstant`
#[inline]
pub(crate) fn add_instant(
    epoch_nanos: i128,
    duration: &NormalizedTimeDuration,
) -> TemporalResult<i128> {
    let result = duration.checked_add_to(epoch_nanos)?;
    if !(NS_MIN_INSTANT..=NS_MAX_INSTANT).contains(&result) {
        return Err(TemporalError::range().with_message("Instant is outside valid limits."));
    }
    Ok(result)
}
