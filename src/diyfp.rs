//! Decomposed floating-point values (`mantissa * 2^exp2`) and the power-of-ten
//! helpers built on them.
//!
//! A [`DecomposedFloat`] carries a full 64-bit mantissa with no implicit bit,
//! which is what lets Grisu2 do its digit generation in plain integer
//! arithmetic. All operations are by-value on a `Copy` type.

use crate::diagnostics::{record_cached_power_clamp, record_parse_overflow};
use crate::errors::{FloatError, Result};
use crate::powers::{
    CACHED_POWERS, CACHED_POWERS_EXP10_STEP, CACHED_POWERS_MIN_EXP10, LADDER_MAX_EXP10,
    POWERS_OF_10,
};
use core::ops::{Mul, Sub};

const DP_SIGNIFICAND_SIZE: u32 = 52;
const DP_EXPONENT_BIAS: i32 = 0x3FF + DP_SIGNIFICAND_SIZE as i32;
const DP_MIN_EXPONENT: i32 = -DP_EXPONENT_BIAS;
const DP_EXPONENT_MASK: u64 = 0x7FF0_0000_0000_0000;
const DP_SIGNIFICAND_MASK: u64 = 0x000F_FFFF_FFFF_FFFF;
const DP_HIDDEN_BIT: u64 = 0x0010_0000_0000_0000;

/// Binary exponent Grisu2 aims the scaled boundary at.
const TARGET_EXP2: i32 = -61;

/// `log10(2)`
const D_1_LOG2_10: f64 = 0.301_029_995_663_981_14;

/// Multiply two 64-bit mantissas and keep the high 64 bits of the product,
/// rounding to nearest on the dropped low word.
///
/// # Example
/// ```
/// # use f64_forge_helpers::mul_u64_rounded;
/// assert_eq!(mul_u64_rounded(1 << 63, 1 << 63), 1 << 62);
/// assert_eq!(mul_u64_rounded(u64::MAX, 1), 1);
/// assert_eq!(mul_u64_rounded((1 << 63) - 1, 1), 0);
/// ```
#[inline(always)]
pub const fn mul_u64_rounded(a: u64, b: u64) -> u64 {
    let product = a as u128 * b as u128;
    let high = (product >> 64) as u64;
    let low = product as u64;
    // cannot overflow: high <= 2^64 - 2
    high + (low >> 63)
}

/// A value `mantissa * 2^exp2` with an explicit 64-bit mantissa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecomposedFloat {
    /// Significand, implicit bit already merged in
    pub mantissa: u64,
    /// Binary exponent applied to `mantissa`
    pub exp2: i32,
}

impl DecomposedFloat {
    #[inline(always)]
    pub const fn new(mantissa: u64, exp2: i32) -> Self {
        DecomposedFloat { mantissa, exp2 }
    }

    /// Split the magnitude of `d` into mantissa and exponent.
    ///
    /// The sign bit is ignored; callers strip it first. Subnormals (and zero)
    /// keep their raw mantissa at the minimum exponent.
    ///
    /// # Example
    /// ```
    /// # use f64_forge_helpers::DecomposedFloat;
    /// let one = DecomposedFloat::from_double(1.0);
    /// assert_eq!(one, DecomposedFloat::new(1 << 52, -52));
    ///
    /// let tiny = DecomposedFloat::from_double(5e-324);
    /// assert_eq!(tiny, DecomposedFloat::new(1, -1074));
    /// ```
    #[inline]
    pub const fn from_double(d: f64) -> Self {
        let bits = d.to_bits();
        let biased_exp = ((bits & DP_EXPONENT_MASK) >> DP_SIGNIFICAND_SIZE) as i32;
        let significand = bits & DP_SIGNIFICAND_MASK;
        if biased_exp != 0 {
            DecomposedFloat {
                mantissa: significand + DP_HIDDEN_BIT,
                exp2: biased_exp - DP_EXPONENT_BIAS,
            }
        } else {
            DecomposedFloat {
                mantissa: significand,
                exp2: DP_MIN_EXPONENT + 1,
            }
        }
    }

    /// Shift the mantissa left until bit 63 is set.
    ///
    /// Must not be called on a zero mantissa.
    #[inline]
    pub const fn normalize(self) -> Self {
        debug_assert!(self.mantissa != 0);
        let shift = self.mantissa.leading_zeros();
        DecomposedFloat {
            mantissa: self.mantissa << shift,
            exp2: self.exp2 - shift as i32,
        }
    }

    /// Midpoints to the neighbouring doubles, as `(minus, plus)`.
    ///
    /// `plus` is normalised; `minus` is shifted onto the same exponent. When
    /// the mantissa is exactly the hidden bit the lower neighbour is half as
    /// far away, so `minus` gets one extra bit of resolution. The mantissa
    /// must be non-zero.
    ///
    /// # Example
    /// ```
    /// # use f64_forge_helpers::DecomposedFloat;
    /// let (minus, plus) = DecomposedFloat::from_double(3.0).normalized_boundaries();
    /// assert_eq!(minus.exp2, plus.exp2);
    /// assert!(minus.mantissa < plus.mantissa);
    /// ```
    #[inline]
    pub fn normalized_boundaries(self) -> (Self, Self) {
        let plus = DecomposedFloat::new((self.mantissa << 1) + 1, self.exp2 - 1).normalize();
        let mut minus = if self.mantissa == DP_HIDDEN_BIT {
            DecomposedFloat::new((self.mantissa << 2) - 1, self.exp2 - 2)
        } else {
            DecomposedFloat::new((self.mantissa << 1) - 1, self.exp2 - 1)
        };
        minus.mantissa <<= minus.exp2 - plus.exp2;
        minus.exp2 = plus.exp2;
        (minus, plus)
    }

    /// Rebuild a double from two 9-digit accumulators and a decimal scale:
    /// `(frac_hi * 10^9 + frac_lo) * 10^exp10`.
    ///
    /// The scale is assembled from the binary ladder `10^1, 10^2, 10^4, ...,
    /// 10^256`, one factor per set bit of `|exp10|`. This is exact only while
    /// the accumulated integer is below 2^53 and `|exp10| <= 22`; outside that
    /// window every multiplication may round. Scales past `10^511`, and
    /// results that overflow to infinity, are reported as
    /// [`FloatError::ParseOverflow`].
    ///
    /// # Example
    /// ```
    /// # use f64_forge_helpers::DecomposedFloat;
    /// assert_eq!(DecomposedFloat::to_double(0, 123_456, -3), Ok(123.456));
    /// assert_eq!(DecomposedFloat::to_double(1, 5, 0), Ok(1_000_000_005.0));
    /// assert!(DecomposedFloat::to_double(1, 0, 600).is_err());
    /// ```
    pub fn to_double(frac_hi: u32, frac_lo: u32, exp10: i32) -> Result<f64> {
        let fraction = 1.0e9 * frac_hi as f64 + frac_lo as f64;
        if exp10 == 0 || fraction == 0.0 {
            return Ok(fraction);
        }

        let magnitude = exp10.unsigned_abs();
        if magnitude > LADDER_MAX_EXP10 as u32 {
            record_parse_overflow(exp10);
            return Err(FloatError::ParseOverflow { exp10 });
        }

        let mut scale = 1.0;
        let mut bits = magnitude;
        let mut i = 0usize;
        while bits != 0 {
            if bits & 1 == 1 {
                scale *= POWERS_OF_10[i];
            }
            bits >>= 1;
            i += 1;
        }

        let value = if exp10 > 0 {
            fraction * scale
        } else {
            fraction / scale
        };
        if value.is_infinite() {
            record_parse_overflow(exp10);
            return Err(FloatError::ParseOverflow { exp10 });
        }
        Ok(value)
    }
}

impl Sub for DecomposedFloat {
    type Output = DecomposedFloat;

    /// Mantissa difference at a shared exponent. Both operands must carry the
    /// same `exp2` and `self.mantissa >= rhs.mantissa`.
    #[inline(always)]
    fn sub(self, rhs: DecomposedFloat) -> DecomposedFloat {
        debug_assert!(self.exp2 == rhs.exp2);
        debug_assert!(self.mantissa >= rhs.mantissa);
        DecomposedFloat {
            mantissa: self.mantissa - rhs.mantissa,
            exp2: self.exp2,
        }
    }
}

impl Mul for DecomposedFloat {
    type Output = DecomposedFloat;

    /// Rounded high half of the 128-bit product. Operands are expected to be
    /// normalised, hence the fixed `+64` on the exponent.
    #[inline(always)]
    fn mul(self, rhs: DecomposedFloat) -> DecomposedFloat {
        DecomposedFloat {
            mantissa: mul_u64_rounded(self.mantissa, rhs.mantissa),
            exp2: self.exp2 + rhs.exp2 + 64,
        }
    }
}

/// One row of the cached power-of-ten table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedPower {
    /// Normalised mantissa of `10^exp10`
    pub mantissa: u64,
    /// Binary exponent of the approximation
    pub exp2: i32,
    /// Decimal exponent this row approximates
    pub exp10: i32,
}

impl CachedPower {
    #[inline(always)]
    pub const fn as_decomposed(&self) -> DecomposedFloat {
        DecomposedFloat::new(self.mantissa, self.exp2)
    }
}

/// Number of rows in the cached power table.
pub const CACHED_POWERS_LEN: usize = CACHED_POWERS.len();

/// Pick the cached power that moves `exp2_target` into Grisu2's working range.
///
/// Returns the power together with the decimal exponent the generated digits
/// must later be scaled by (the negated row label). Indices outside the table
/// are clamped to its first or last row and counted in
/// [`crate::range_events`]; finite doubles never reach that branch.
///
/// # Example
/// ```
/// # use f64_forge_helpers::get_cached_power;
/// let (power, exp10) = get_cached_power(-63);
/// assert_eq!(exp10, -power.exp10);
/// assert!(power.mantissa >> 63 == 1);
/// ```
pub fn get_cached_power(exp2_target: i32) -> (CachedPower, i32) {
    let dk = (TARGET_EXP2 as f64 - exp2_target as f64) * D_1_LOG2_10 + 347.0;
    let mut k = dk as i32;
    if dk - k as f64 > 0.0 {
        k += 1;
    }

    let computed = (k >> 3) + 1;
    let index = computed.clamp(0, CACHED_POWERS_LEN as i32 - 1);
    if index != computed {
        record_cached_power_clamp(exp2_target, computed);
    }

    let (mantissa, exp2, label) = CACHED_POWERS[index as usize];
    debug_assert!(label == CACHED_POWERS_MIN_EXP10 + index * CACHED_POWERS_EXP10_STEP);
    (
        CachedPower {
            mantissa,
            exp2,
            exp10: label,
        },
        -label,
    )
}
