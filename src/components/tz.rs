//! This module implements the time zone capabilities that zoned anchors use.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::{
    iso::IsoDateTime, options::Disambiguation, TemporalError, TemporalResult, NS_MAX_INSTANT,
    NS_MIN_INSTANT, NS_PER_DAY,
};

/// The capability set of a time zone.
///
/// Only `get_offset_nanos_for` must be provided. The remaining methods derive
/// wall-clock conversions from the offset lookup.
pub trait TzProtocol: Clone + Debug {
    /// Returns the UTC offset in nanoseconds in effect at `epoch_ns`.
    fn get_offset_nanos_for(&self, epoch_ns: i128) -> TemporalResult<i128>;

    /// `GetPlainDateTimeFor`
    fn get_iso_datetime_for(&self, epoch_ns: i128) -> TemporalResult<IsoDateTime> {
        let offset = self.get_offset_nanos_for(epoch_ns)?;
        IsoDateTime::from_epoch_nanos(epoch_ns, offset)
    }

    /// `GetPossibleInstantsFor`
    ///
    /// Returns the sorted epoch nanosecond values whose local time in this
    /// zone is `iso`. A gap yields no values and a fold yields two.
    fn get_possible_epoch_ns_for(&self, iso: &IsoDateTime) -> TemporalResult<Vec<i128>> {
        let local = iso.as_nanoseconds();
        let day = i128::from(NS_PER_DAY);
        let offset_before = self.get_offset_nanos_for(local - day)?;
        let offset_after = self.get_offset_nanos_for(local + day)?;

        let mut candidates = Vec::with_capacity(2);
        for offset in [offset_before, offset_after] {
            let candidate = local - offset;
            if self.get_offset_nanos_for(candidate)? == offset && !candidates.contains(&candidate)
            {
                candidates.push(candidate);
            }
        }
        candidates.sort_unstable();
        Ok(candidates)
    }

    /// `GetEpochNanosecondsFor`
    fn get_epoch_nanoseconds_for(
        &self,
        iso: &IsoDateTime,
        disambiguation: Disambiguation,
    ) -> TemporalResult<i128> {
        let possible = self.get_possible_epoch_ns_for(iso)?;
        let result = match (possible.as_slice(), disambiguation) {
            ([single], _) => *single,
            ([earlier, ..], Disambiguation::Compatible | Disambiguation::Earlier) => *earlier,
            ([.., later], Disambiguation::Later) => *later,
            (_, Disambiguation::Reject) => {
                return Err(TemporalError::range()
                    .with_message("Local time does not resolve to a single instant."))
            }
            ([], _) => {
                // The local time falls in a gap, so shift it by the length of the gap.
                let local = iso.as_nanoseconds();
                let day = i128::from(NS_PER_DAY);
                let offset_before = self.get_offset_nanos_for(local - day)?;
                let offset_after = self.get_offset_nanos_for(local + day)?;
                if disambiguation == Disambiguation::Earlier {
                    local - offset_after
                } else {
                    local - offset_before
                }
            }
        };

        if !(NS_MIN_INSTANT..=NS_MAX_INSTANT).contains(&result) {
            return Err(TemporalError::range().with_message("Instant is outside valid limits."));
        }
        Ok(result)
    }
}

/// A time zone with a single fixed offset from UTC.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcOffset(i16);

impl UtcOffset {
    /// The `UTC` offset.
    pub const UTC: Self = Self(0);

    /// Creates a new `UtcOffset` from an offset in minutes.
    pub fn from_minutes(minutes: i16) -> TemporalResult<Self> {
        if minutes.abs() >= 24 * 60 {
            return Err(TemporalError::range().with_message("UTC offset exceeds a valid range."));
        }
        Ok(Self(minutes))
    }

    /// Returns the offset in minutes.
    #[inline]
    #[must_use]
    pub fn minutes(&self) -> i16 {
        self.0
    }
}

impl TzProtocol for UtcOffset {
    fn get_offset_nanos_for(&self, _: i128) -> TemporalResult<i128> {
        Ok(i128::from(self.0) * 60_000_000_000)
    }
}
