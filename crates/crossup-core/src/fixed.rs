//! Deterministic fixed-point arithmetic
//!
//! Q16.16 fixed point backed by a single `i32`. Floating point produces
//! different bit patterns across platforms and runtimes; every quantity that
//! feeds the simulation goes through this type instead, so two clients doing
//! the same math always land on the same integer.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Number of fractional bits
pub const FRACTIONAL_BITS: u32 = 16;

/// Scale factor (one whole unit in raw terms)
pub const SCALE: i32 = 1 << FRACTIONAL_BITS; // 65536

/// A fixed-point number with 16 fractional bits.
///
/// Immutable: every operation returns a new value. Ordering and equality are
/// derived on the raw integer, never on the float projection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Fixed(i32);

impl Fixed {
    /// Zero.
    pub const ZERO: Fixed = Fixed(0);

    /// One whole unit.
    pub const ONE: Fixed = Fixed(SCALE);

    /// Construct directly from the raw integer representation.
    ///
    /// This is the deserialization-side half of the canonical round trip:
    /// `Fixed::from_raw(v.raw()) == v` bit-exactly.
    pub const fn from_raw(raw: i32) -> Self {
        Fixed(raw)
    }

    /// Construct from an integer. Representable range is roughly ±32767.
    pub const fn from_int(value: i32) -> Self {
        Fixed(value * SCALE)
    }

    /// Construct from a float, rounding half away from zero.
    ///
    /// Only safe at the edges of the system (constants, input from config);
    /// never convert back and forth inside simulation code.
    pub fn from_float(value: f64) -> Self {
        Fixed((value * SCALE as f64).round() as i32)
    }

    /// The raw integer representation.
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Project to a float. For display and external consumers only.
    pub fn to_float(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    /// Truncate to an integer (floor).
    pub fn to_int(self) -> i32 {
        self.0.div_euclid(SCALE)
    }

    /// Absolute value.
    pub fn abs(self) -> Fixed {
        Fixed(self.0.abs())
    }

    /// Multiply: `round(a * b / SCALE)`, widened to 64 bits internally so the
    /// intermediate product cannot overflow.
    pub fn mul(self, rhs: Fixed) -> Fixed {
        Fixed(round_half_away(self.0 as i64 * rhs.0 as i64, SCALE as i64) as i32)
    }

    /// Divide: `round(a * SCALE / b)`.
    ///
    /// Fails with [`Error::DivisionByZero`] when the divisor's raw value is
    /// zero; never returns a sentinel.
    pub fn div(self, rhs: Fixed) -> Result<Fixed> {
        if rhs.0 == 0 {
            return Err(Error::DivisionByZero);
        }
        Ok(Fixed(
            round_half_away((self.0 as i64) << FRACTIONAL_BITS, rhs.0 as i64) as i32,
        ))
    }
}

/// Integer division rounding half away from zero.
///
/// This is the single rounding rule for the whole crate. Both peers must
/// round identically or the simulations drift, so `mul` and `div` share this
/// helper and nothing else in the crate rounds.
fn round_half_away(n: i64, d: i64) -> i64 {
    let q = n / d;
    let r = n % d;
    if r == 0 {
        q
    } else if r.abs() * 2 >= d.abs() {
        if (n < 0) == (d < 0) {
            q + 1
        } else {
            q - 1
        }
    } else {
        q
    }
}

impl Add for Fixed {
    type Output = Fixed;

    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Fixed) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_float())
    }
}
