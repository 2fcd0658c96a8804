//! This module implements `PlainDate`, the calendar date anchor.

use crate::{
    components::{calendar::CalendarProtocol, duration::DateDuration},
    iso::IsoDate,
    options::{ArithmeticOverflow, TemporalUnit},
    TemporalResult,
};

/// A calendar date along with the calendar that its arithmetic is resolved in.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainDate<C: CalendarProtocol> {
    pub(crate) iso: IsoDate,
    calendar: C,
}

// ==== Private API ====

impl<C: CalendarProtocol> PlainDate<C> {
    /// Create a new `PlainDate` with the date values and calendar slot.
    #[inline]
    #[must_use]
    pub(crate) fn new_unchecked(iso: IsoDate, calendar: C) -> Self {
        Self { iso, calendar }
    }

    /// `AddDate`
    pub(crate) fn add_date(
        &self,
        duration: &DateDuration,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        let iso = self.calendar.date_add(&self.iso, duration, overflow)?;
        Ok(Self::new_unchecked(iso, self.calendar.clone()))
    }

    /// `DifferenceDate`
    pub(crate) fn until_date(
        &self,
        other: &Self,
        largest_unit: TemporalUnit,
    ) -> TemporalResult<DateDuration> {
        self.calendar
            .date_until(&self.iso, &other.iso, largest_unit)
    }

    /// `DaysUntil`
    pub(crate) fn days_until(&self, other: &Self) -> TemporalResult<f64> {
        Ok(self.until_date(other, TemporalUnit::Day)?.days)
    }

    /// `MoveRelativeDate`
    ///
    /// Advances this date by `duration` and returns the new date along with
    /// the number of days elapsed.
    pub(crate) fn move_relative_date(
        &self,
        duration: &DateDuration,
    ) -> TemporalResult<(Self, f64)> {
        let new_date = self.add_date(duration, ArithmeticOverflow::Constrain)?;
        let days = self.days_until(&new_date)?;
        Ok((new_date, days))
    }
}

// ==== Public API ====

impl<C: CalendarProtocol> PlainDate<C> {
    /// Creates a new `PlainDate`, rejecting invalid dates.
    pub fn new(year: i32, month: u8, day: u8, calendar: C) -> TemporalResult<Self> {
        Self::new_with_overflow(year, month, day, calendar, ArithmeticOverflow::Reject)
    }

    /// Creates a new `PlainDate`, regulating the values according to `overflow`.
    pub fn new_with_overflow(
        year: i32,
        month: u8,
        day: u8,
        calendar: C,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        let iso = IsoDate::new_with_overflow(year, month.into(), day.into(), overflow)?;
        Ok(Self::new_unchecked(iso, calendar))
    }

    /// Returns this date's ISO year value.
    #[inline]
    #[must_use]
    pub const fn iso_year(&self) -> i32 {
        self.iso.year
    }

    /// Returns this date's ISO month value.
    #[inline]
    #[must_use]
    pub const fn iso_month(&self) -> u8 {
        self.iso.month
    }

    /// Returns this date's ISO day value.
    #[inline]
    #[must_use]
    pub const fn iso_day(&self) -> u8 {
        self.iso.day
    }

    /// Returns the underlying `IsoDate`.
    #[inline]
    #[must_use]
    pub const fn iso_date(&self) -> IsoDate {
        self.iso
    }

    /// Returns a reference to this date's calendar.
    #[inline]
    #[must_use]
    pub fn calendar(&self) -> &C {
        &self.calendar
    }
}
