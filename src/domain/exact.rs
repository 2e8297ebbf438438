//! Exact arithmetic substrate.
//!
//! The settlement scheme's load-bearing property is that pre-rounding payouts
//! cancel to exactly zero. That only holds if scores, averages, and payouts
//! are computed without representational drift, so everything upstream of the
//! final currency rounding runs on arbitrary-precision rationals. `Decimal`
//! appears only at the edges: document values are lifted losslessly into
//! `BigRational`, and results are narrowed back after rounding.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;

use super::error::DomainError;

/// Scale (decimal places) used for stored Brier scores and averages.
pub const SCORE_SCALE: u32 = 4;

/// Scale (decimal places) used for currency amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Lift a `Decimal` into an exact rational.
///
/// `Decimal` is mantissa × 10^-scale, so the conversion is always lossless.
#[must_use]
pub fn to_rational(value: Decimal) -> BigRational {
    let mantissa = BigInt::from(value.mantissa());
    let denom = BigInt::from(10u8).pow(value.scale());
    BigRational::new(mantissa, denom)
}

/// Round to the nearest integer, ties away from zero.
///
/// This is the single rounding mode of the pipeline, applied at every
/// narrowing site (scores, payouts, reconciliation residual).
fn round_half_away(value: &BigRational) -> BigInt {
    let floor = value.floor().to_integer();
    let frac = value - BigRational::from_integer(floor.clone());
    let half = BigRational::new(BigInt::one(), BigInt::from(2));

    match frac.cmp(&half) {
        Ordering::Less => floor,
        Ordering::Greater => floor + 1,
        // frac == 1/2: away from zero means up for positives, down for
        // negatives, and "down" is exactly the floor we already have.
        Ordering::Equal => {
            if value.is_negative() {
                floor
            } else {
                floor + 1
            }
        }
    }
}

/// Round a rational to `scale` decimal places and narrow it to a `Decimal`.
///
/// # Errors
/// `DomainError::ValueOutOfRange` if the scaled integer does not fit in the
/// `Decimal` mantissa. Unreachable for any sane stake, but stakes come from
/// user documents.
pub fn to_decimal(value: &BigRational, scale: u32) -> Result<Decimal, DomainError> {
    let factor = BigInt::from(10u8).pow(scale);
    let units = round_half_away(&(value * BigRational::from_integer(factor)));
    let units = units.to_i128().ok_or(DomainError::ValueOutOfRange)?;
    Ok(Decimal::from_i128_with_scale(units, scale))
}

/// Exact rational zero, for summation checks.
#[must_use]
pub fn zero() -> BigRational {
    BigRational::zero()
}
