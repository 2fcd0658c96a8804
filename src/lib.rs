//! The `temporal_duration` crate is an implementation of the calendar-aware
//! arithmetic behind ECMAScript's `Temporal.Duration` in Rust.
//!
//! ```rust
//! use temporal_duration::{
//!     options::{RelativeTo, RoundingOptions, TemporalUnit},
//!     Duration, IsoCalendar, PlainDate, UtcOffset,
//! };
//! use core::str::FromStr;
//!
//! // Durations round-trip through their canonical text form.
//! let duration = Duration::from_str("P1Y2M3DT4H").unwrap();
//! assert_eq!(duration.to_string(), "P1Y2M3DT4H");
//!
//! // Calendar units are resolved against an anchor date.
//! let anchor = PlainDate::new(2020, 1, 1, IsoCalendar).unwrap();
//! let mut options = RoundingOptions::default();
//! options.largest_unit = Some(TemporalUnit::Day);
//! let days = Duration::new(0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0)
//!     .unwrap()
//!     .round(options, Some(RelativeTo::<_, UtcOffset>::PlainDate(&anchor)))
//!     .unwrap();
//! assert_eq!(days.days(), 60.0);
//! ```
//!
//! [`Temporal`][proposal] is the Stage 3 proposal for ECMAScript that
//! provides new JS objects and functions for working with dates and
//! times that fully supports time zones and non-gregorian calendars.
//!
//! The abstract operations implemented here follow the proposal's
//! [draft][spec].
//!
//! [proposal]: https://github.com/tc39/proposal-temporal
//! [spec]: https://tc39.es/proposal-temporal/
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/boa-dev/boa/main/assets/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/boa-dev/boa/main/assets/logo.svg"
)]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    // Currently throws a false positive regarding dependencies that are only used in benchmarks.
    unused_crate_dependencies,
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::cognitive_complexity,
    clippy::missing_errors_doc,
    clippy::let_unit_value,
    clippy::option_if_let_else,

    // It may be worth to look if we can fix the issues highlighted by these lints.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap,

    // Add temporarily - Needs addressing
    clippy::missing_panics_doc,
)]

extern crate alloc;

pub mod components;
pub mod error;
pub mod iso;
pub mod options;
pub mod parsers;
pub mod primitive;

#[doc(hidden)]
pub(crate) mod rounding;
#[doc(hidden)]
pub(crate) mod utils;

#[doc(inline)]
pub use error::{ErrorKind, TemporalError};

#[doc(inline)]
pub use components::{
    calendar::{CalendarProtocol, IsoCalendar},
    duration::{
        to_limited_temporal_duration, to_partial_duration, to_temporal_duration, DurationLike,
        DurationLikeObject,
    },
    tz::{TzProtocol, UtcOffset},
    DateDuration, Duration, PartialDuration, PlainDate, TimeDuration, ZonedDateTime,
};

/// The `Result` type returned by fallible operations in this crate.
pub type TemporalResult<T> = Result<T, TemporalError>;

/// A library specific trait for unwrapping assertions.
pub(crate) trait TemporalUnwrap {
    type Output;

    /// `temporal_duration` based assertion for unwrapping. This will panic in
    /// debug builds, but throws error during runtime.
    fn temporal_unwrap(self) -> TemporalResult<Self::Output>;
}

impl<T> TemporalUnwrap for Option<T> {
    type Output = T;

    fn temporal_unwrap(self) -> TemporalResult<Self::Output> {
        debug_assert!(self.is_some());
        self.ok_or(TemporalError::assert())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! temporal_assert {
    ($condition:expr $(,)*) => {
        if !$condition {
            return Err($crate::TemporalError::assert());
        }
    };
    ($condition:expr, $($args:tt)+) => {
        if !$condition {
            #[cfg(feature = "log")]
            log::error!($($args)+);
            return Err($crate::TemporalError::assert());
        }
    };
}

/// A general Sign type.
#[repr(i8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sign {
    #[default]
    Positive = 1,
    Zero = 0,
    Negative = -1,
}

// Relevant numeric constants
/// Nanoseconds per day constant: 8.64e+13
pub const NS_PER_DAY: u64 = MS_PER_DAY as u64 * 1_000_000;
/// Milliseconds per day constant: 8.64e+7
pub const MS_PER_DAY: u32 = 24 * 60 * 60 * 1000;
/// The largest magnitude a duration field may hold: 2^53 - 1
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
/// Max Instant nanosecond constant
#[doc(hidden)]
pub(crate) const NS_MAX_INSTANT: i128 = NS_PER_DAY as i128 * 100_000_000i128;
/// Min Instant nanosecond constant
#[doc(hidden)]
pub(crate) const NS_MIN_INSTANT: i128 = -NS_MAX_INSTANT;
