//! Implementation of the FiniteF64 primitive

use crate::{TemporalError, TemporalResult};

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};

/// An `f64` that is guaranteed to be finite.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct FiniteF64(pub(crate) f64);

impl FiniteF64 {
    #[inline]
    pub fn as_inner(&self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    #[inline]
    pub fn negate(&self) -> Self {
        if !self.is_zero() {
            Self(-self.0)
        } else {
            *self
        }
    }

    pub fn copysign(&self, other: f64) -> Self {
        if self.is_zero() {
            return *self;
        }
        Self(self.0.copysign(other))
    }

    /// Returns whether the value has no fractional part.
    #[inline]
    pub fn is_integral(&self) -> bool {
        self.0.trunc() == self.0
    }

    /// Equivalent to `ToIntegerWithoutRounding`: rejects values with a fractional part.
    pub fn to_integer_without_rounding(value: f64) -> TemporalResult<Self> {
        let finite = Self::try_from(value)?;
        if !finite.is_integral() {
            return Err(
                TemporalError::range().with_message("number value is not an integral value.")
            );
        }
        // Normalize negative zero.
        Ok(Self(finite.0 + 0.0))
    }

    pub(crate) fn as_date_value(&self) -> TemporalResult<i32> {
        if !(f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&self.0) {
            return Err(TemporalError::range().with_message("number exceeds a valid date value."));
        }
        Ok(self.0 as i32)
    }
}

impl TryFrom<f64> for FiniteF64 {
    type Error = TemporalError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(TemporalError::range().with_message("number value is not a finite value."));
        }
        Ok(Self(value))
    }
}

impl TryFrom<u64> for FiniteF64 {
    type Error = TemporalError;
    fn try_from(value: u64) -> Result<Self, Self::Error> {
        let result = f64::from_u64(value)
            .ok_or(TemporalError::range().with_message("days exceeded a valid range."))?;
        Ok(Self(result))
    }
}

impl TryFrom<&BigInt> for FiniteF64 {
    type Error = TemporalError;
    fn try_from(value: &BigInt) -> Result<Self, Self::Error> {
        let result = value
            .to_f64()
            .ok_or(TemporalError::range().with_message("number exceeded a valid range."))?;
        Self::try_from(result)
    }
}

impl From<i32> for FiniteF64 {
    fn from(value: i32) -> Self {
        Self(f64::from(value))
    }
}

impl From<u32> for FiniteF64 {
    fn from(value: u32) -> Self {
        Self(f64::from(value))
    }
}

impl From<FiniteF64> for f64 {
    fn from(value: FiniteF64) -> Self {
        value.0
    }
}

impl PartialEq<f64> for FiniteF64 {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<f64> for FiniteF64 {
    fn partial_cmp(&self, other: &f64) -> Option<core::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}
