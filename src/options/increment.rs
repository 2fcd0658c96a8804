//! The `roundingIncrement` option.

use core::num::NonZeroU32;

use crate::{TemporalError, TemporalResult};

/// A validated rounding increment: a positive integer no greater than 1e9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoundingIncrement(pub(crate) NonZeroU32);

impl Default for RoundingIncrement {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<f64> for RoundingIncrement {
    type Error = TemporalError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        // 1. If increment is not finite, throw a RangeError exception.
        if !value.is_finite() {
            return Err(
                TemporalError::range().with_message("roundingIncrement must be a finite value.")
            );
        }
        // 2. Let integerIncrement be truncate(ℝ(increment)).
        let integer = value.trunc();
        // 3. If integerIncrement < 1 or integerIncrement > 10**9, throw a RangeError exception.
        if !(1.0..=1_000_000_000.0).contains(&integer) {
            return Err(TemporalError::range()
                .with_message("roundingIncrement is not within a valid range."));
        }
        Self::try_new(integer as u32)
    }
}

impl RoundingIncrement {
    /// The default increment of one unit.
    pub const ONE: Self = match NonZeroU32::new(1) {
        Some(one) => Self(one),
        None => unreachable!(),
    };

    /// Creates a new `RoundingIncrement`, failing if `increment` is zero or exceeds 1e9.
    pub fn try_new(increment: u32) -> TemporalResult<Self> {
        if increment > 1_000_000_000 {
            return Err(TemporalError::range()
                .with_message("roundingIncrement is not within a valid range."));
        }
        NonZeroU32::new(increment).map(Self).ok_or(
            TemporalError::range().with_message("roundingIncrement is not within a valid range."),
        )
    }

    /// Returns the increment as a `u32`.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// `ValidateTemporalRoundingIncrement`
    pub(crate) fn validate(self, dividend: u64, inclusive: bool) -> TemporalResult<()> {
        // 1. If inclusive is true, let maximum be dividend.
        // 2. Else, let maximum be dividend - 1.
        let maximum = if inclusive { dividend } else { dividend - 1 };
        let increment = u64::from(self.get());

        // 3. If increment > maximum, throw a RangeError exception.
        if increment > maximum {
            return Err(
                TemporalError::range().with_message("roundingIncrement exceeds maximum.")
            );
        }

        // 4. If dividend modulo increment ≠ 0, throw a RangeError exception.
        if dividend.rem_euclid(increment) != 0 {
            return Err(TemporalError::range()
                .with_message("dividend is not divisible by roundingIncrement."));
        }

        Ok(())
    }
}
