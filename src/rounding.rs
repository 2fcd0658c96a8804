//! Implementation of increment rounding functionality

use crate::options::{RoundingMode, UnsignedRoundingMode};

use core::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

/// A number that can be rounded to a multiple of an increment.
///
/// The `result_*` methods operate on the absolute value of the dividend and
/// return the whole number of increments below or above it.
pub(crate) trait Roundable: Clone {
    fn is_negative_value(&self) -> bool;
    fn is_exact(dividend: &Self, divisor: &Self) -> bool;
    fn compare_remainder(dividend: &Self, divisor: &Self) -> Option<Ordering>;
    fn is_even_cardinal(dividend: &Self, divisor: &Self) -> bool;
    fn result_floor(dividend: &Self, divisor: &Self) -> Self;
    fn result_ceil(dividend: &Self, divisor: &Self) -> Self;
    fn to_signed_multiple(quotient: Self, divisor: &Self, is_positive: bool) -> Self;
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IncrementRounder<T: Roundable> {
    sign: bool,
    dividend: T,
    divisor: T,
}

impl<T: Roundable> IncrementRounder<T> {
    /// Creates a rounder for `number` with a positive `increment`.
    #[inline]
    pub(crate) fn from_signed_num(number: T, increment: T) -> Self {
        Self {
            sign: !number.is_negative_value(),
            dividend: number,
            divisor: increment,
        }
    }

    /// Rounds the number to a multiple of the increment.
    #[inline]
    pub(crate) fn round(&self, mode: RoundingMode) -> T {
        let unsigned_rounding_mode = mode.get_unsigned_round_mode(self.sign);
        let quotient =
            apply_unsigned_rounding_mode(&self.dividend, &self.divisor, unsigned_rounding_mode);
        T::to_signed_multiple(quotient, &self.divisor, self.sign)
    }
}

impl Roundable for f64 {
    fn is_negative_value(&self) -> bool {
        *self < 0.0
    }

    fn is_exact(dividend: &Self, divisor: &Self) -> bool {
        let quotient = (dividend / divisor).abs();
        quotient == quotient.floor()
    }

    fn compare_remainder(dividend: &Self, divisor: &Self) -> Option<Ordering> {
        let quotient = (dividend / divisor).abs();
        let d1 = quotient - quotient.floor();
        let d2 = quotient.ceil() - quotient;
        d1.partial_cmp(&d2)
    }

    fn is_even_cardinal(dividend: &Self, divisor: &Self) -> bool {
        (dividend / divisor).abs().floor() % 2.0 == 0.0
    }

    fn result_floor(dividend: &Self, divisor: &Self) -> Self {
        (dividend / divisor).abs().floor()
    }

    fn result_ceil(dividend: &Self, divisor: &Self) -> Self {
        (dividend / divisor).abs().ceil()
    }

    fn to_signed_multiple(quotient: Self, divisor: &Self, is_positive: bool) -> Self {
        let rounded = quotient * divisor;
        if is_positive || rounded == 0.0 {
            rounded
        } else {
            -rounded
        }
    }
}

impl Roundable for BigInt {
    fn is_negative_value(&self) -> bool {
        self.is_negative()
    }

    fn is_exact(dividend: &Self, divisor: &Self) -> bool {
        (dividend.abs() % divisor).is_zero()
    }

    fn compare_remainder(dividend: &Self, divisor: &Self) -> Option<Ordering> {
        let remainder = dividend.abs() % divisor;
        Some((remainder * 2u32).cmp(divisor))
    }

    fn is_even_cardinal(dividend: &Self, divisor: &Self) -> bool {
        (Roundable::result_floor(dividend, divisor) % 2u32).is_zero()
    }

    fn result_floor(dividend: &Self, divisor: &Self) -> Self {
        dividend.abs() / divisor
    }

    fn result_ceil(dividend: &Self, divisor: &Self) -> Self {
        dividend.abs() / divisor + 1u32
    }

    fn to_signed_multiple(quotient: Self, divisor: &Self, is_positive: bool) -> Self {
        let rounded = quotient * divisor;
        if is_positive {
            rounded
        } else {
            -rounded
        }
    }
}

/// Applies the unsigned rounding mode.
fn apply_unsigned_rounding_mode<T: Roundable>(
    dividend: &T,
    divisor: &T,
    unsigned_rounding_mode: UnsignedRoundingMode,
) -> T {
    // 1. If x is equal to r1, return r1.
    if Roundable::is_exact(dividend, divisor) {
        return Roundable::result_floor(dividend, divisor);
    }
    // 2. Assert: r1 < x < r2.
    // 3. Assert: unsignedRoundingMode is not undefined.

    // 4. If unsignedRoundingMode is zero, return r1.
    if unsigned_rounding_mode == UnsignedRoundingMode::Zero {
        return Roundable::result_floor(dividend, divisor);
    };
    // 5. If unsignedRoundingMode is infinity, return r2.
    if unsigned_rounding_mode == UnsignedRoundingMode::Infinity {
        return Roundable::result_ceil(dividend, divisor);
    };

    // 6. Let d1 be x – r1.
    // 7. Let d2 be r2 – x.
    // 8. If d1 < d2, return r1.
    // 9. If d2 < d1, return r2.
    match Roundable::compare_remainder(dividend, divisor) {
        Some(Ordering::Less) => Roundable::result_floor(dividend, divisor),
        Some(Ordering::Greater) => Roundable::result_ceil(dividend, divisor),
        Some(Ordering::Equal) => {
            // 10. Assert: d1 is equal to d2.
            // 11. If unsignedRoundingMode is half-zero, return r1.
            if unsigned_rounding_mode == UnsignedRoundingMode::HalfZero {
                return Roundable::result_floor(dividend, divisor);
            };
            // 12. If unsignedRoundingMode is half-infinity, return r2.
            if unsigned_rounding_mode == UnsignedRoundingMode::HalfInfinity {
                return Roundable::result_ceil(dividend, divisor);
            };
            // 13. Assert: unsignedRoundingMode is half-even.
            debug_assert!(unsigned_rounding_mode == UnsignedRoundingMode::HalfEven);
            // 14. Let cardinality be (r1 / (r2 – r1)) modulo 2.
            // 15. If cardinality is 0, return r1.
            if Roundable::is_even_cardinal(dividend, divisor) {
                return Roundable::result_floor(dividend, divisor);
            }
            // 16. Return r2.
            Roundable::result_ceil(dividend, divisor)
        }
        // NOTE: only reachable for NaN, which the callers never construct.
        None => Roundable::result_floor(dividend, divisor),
    }
}
