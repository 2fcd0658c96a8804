//! The `relativeTo` rounding option.

use crate::components::{
    calendar::CalendarProtocol, tz::TzProtocol, PlainDate, ZonedDateTime,
};
use crate::TemporalResult;

/// A borrowed anchor that calendar units are resolved against.
///
/// The anchor is owned by the caller; operations only read from it and
/// construct new anchors when they need to step forward.
#[derive(Debug)]
pub enum RelativeTo<'a, C: CalendarProtocol, Z: TzProtocol> {
    /// A calendar date anchor.
    PlainDate(&'a PlainDate<C>),
    /// A zoned instant anchor.
    ZonedDateTime(&'a ZonedDateTime<C, Z>),
}

impl<C: CalendarProtocol, Z: TzProtocol> Clone for RelativeTo<'_, C, Z> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: CalendarProtocol, Z: TzProtocol> Copy for RelativeTo<'_, C, Z> {}

impl<'a, C: CalendarProtocol, Z: TzProtocol> From<&'a PlainDate<C>> for RelativeTo<'a, C, Z> {
    fn from(value: &'a PlainDate<C>) -> Self {
        Self::PlainDate(value)
    }
}

impl<'a, C: CalendarProtocol, Z: TzProtocol> From<&'a ZonedDateTime<C, Z>>
    for RelativeTo<'a, C, Z>
{
    fn from(value: &'a ZonedDateTime<C, Z>) -> Self {
        Self::ZonedDateTime(value)
    }
}

impl<'a, C: CalendarProtocol, Z: TzProtocol> RelativeTo<'a, C, Z> {
    /// Returns the zoned anchor, if this is one.
    #[inline]
    #[must_use]
    pub fn as_zoned_date_time(self) -> Option<&'a ZonedDateTime<C, Z>> {
        match self {
            Self::ZonedDateTime(zdt) => Some(zdt),
            Self::PlainDate(_) => None,
        }
    }

    /// Returns the calendar date of this anchor.
    ///
    /// For a zoned anchor this is the local date in the anchor's time zone.
    pub fn to_plain_date(&self) -> TemporalResult<PlainDate<C>> {
        match self {
            Self::PlainDate(date) => Ok((*date).clone()),
            Self::ZonedDateTime(zdt) => zdt.to_plain_date(),
        }
    }
}
