//! This module implements the calendar capabilities that duration arithmetic
//! depends on.
//!
//! Duration math only needs two operations from a calendar: adding a date
//! duration to a date and computing the difference between two dates. Any
//! calendar that provides those can be plugged in through `CalendarProtocol`.

use core::fmt::Debug;

use crate::{
    components::duration::DateDuration,
    iso::IsoDate,
    options::{ArithmeticOverflow, TemporalUnit},
    TemporalResult,
};

/// The capability set of a calendar used for resolving calendar units.
pub trait CalendarProtocol: Clone + Debug {
    /// Returns the calendar's identifier.
    fn identifier(&self) -> &str;

    /// `CalendarDateAdd`
    ///
    /// Adds a `DateDuration` to the provided date.
    fn date_add(
        &self,
        date: &IsoDate,
        duration: &DateDuration,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<IsoDate>;

    /// `CalendarDateUntil`
    ///
    /// Returns the difference from `one` to `two` with no unit coarser than
    /// `largest_unit` populated.
    fn date_until(
        &self,
        one: &IsoDate,
        two: &IsoDate,
        largest_unit: TemporalUnit,
    ) -> TemporalResult<DateDuration>;
}

/// The ISO 8601 calendar.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IsoCalendar;

impl CalendarProtocol for IsoCalendar {
    fn identifier(&self) -> &str {
        "iso8601"
    }

    fn date_add(
        &self,
        date: &IsoDate,
        duration: &DateDuration,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<IsoDate> {
        date.add_date_duration(duration, overflow)
    }

    fn date_until(
        &self,
        one: &IsoDate,
        two: &IsoDate,
        largest_unit: TemporalUnit,
    ) -> TemporalResult<DateDuration> {
        // Units finer than a day are differenced as days.
        let largest_unit = largest_unit.max(TemporalUnit::Day);
        one.diff_iso_date(two, largest_unit)
    }
}
