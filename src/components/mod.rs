//! The primary components provided by this crate.
//!
//! `Duration` is the core component. `PlainDate` and `ZonedDateTime` are the
//! anchors that calendar units are resolved against, while the calendar and
//! time zone capabilities are provided by implementors of `CalendarProtocol`
//! and `TzProtocol`.

pub mod calendar;
pub mod duration;
pub mod tz;

mod date;
mod zoneddatetime;

#[doc(inline)]
pub use date::PlainDate;
#[doc(inline)]
pub use duration::{DateDuration, Duration, PartialDuration, TimeDuration};
#[doc(inline)]
pub use zoneddatetime::ZonedDateTime;
