//! Decimal text to `f64` parsing.
//!
//! `strtod`-shaped: leading whitespace, an optional sign, digits with at most
//! one decimal point, then an optional `[eE][+-]?digits` suffix. Parsing stops
//! at the first byte that does not continue the number and reports how many
//! bytes were consumed; input without any digit yields `(0.0, 0)`.
//!
//! # Reconstruction
//!
//! Up to 18 significant digits are accumulated into a `(frac_hi, frac_lo)`
//! pair of 9-digit integers. When that integer and its decimal scale are small
//! enough for the binary ladder in [`DecomposedFloat::to_double`] to be exact
//! (integer `<= 2^53`, `|exp10| <= 22`), the ladder is used. Everything else
//! goes to `minimal_lexical`, which rounds correctly for any digit count, so
//! shortest-digit text from [`crate::format_double`] always reads back to the
//! identical double.
//!
//! Leading zeros are not significant: `"0.000001234"` uses 4 accumulator
//! digits, not 10.

use crate::diagnostics::record_parse_overflow;
use crate::diyfp::DecomposedFloat;
use crate::errors::{FloatError, Result};

/// Significant digits the `(frac_hi, frac_lo)` accumulator holds
const ACCUMULATOR_DIGITS: usize = 18;

/// Largest integer every `f64` operation in the ladder represents exactly
const EXACT_INTEGER_MAX: u64 = 1 << 53;

/// Largest power of ten that is itself an exact `f64`
const EXACT_EXP10_MAX: i32 = 22;

/// Explicit exponents stop accumulating here. Far beyond anything a finite or
/// non-zero double can need, and small enough that adding digit counts cannot
/// overflow `i32`.
const EXPLICIT_EXP10_LIMIT: i32 = 100_000;

#[inline(always)]
fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

/// The lexical pieces of one decimal number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DecimalParts<'a> {
    negative: bool,
    /// Integer digits without leading zeros
    integer: &'a [u8],
    /// Fraction digits without trailing zeros
    fraction: &'a [u8],
    /// Explicit exponent, saturated at `EXPLICIT_EXP10_LIMIT`
    exponent: i32,
    consumed: usize,
}

impl<'a> DecimalParts<'a> {
    /// Scan `buf`; `None` when no digit was found.
    fn scan(buf: &'a [u8]) -> Option<Self> {
        let len = buf.len();
        let mut i = 0usize;
        while i < len && buf[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut negative = false;
        if i < len && (buf[i] == b'-' || buf[i] == b'+') {
            negative = buf[i] == b'-';
            i += 1;
        }

        let int_start = i;
        while i < len && is_digit(buf[i]) {
            i += 1;
        }
        let int_end = i;

        let mut frac_start = i;
        let mut frac_end = i;
        if i < len && buf[i] == b'.' {
            i += 1;
            frac_start = i;
            while i < len && is_digit(buf[i]) {
                i += 1;
            }
            frac_end = i;
        }

        if int_start == int_end && frac_start == frac_end {
            return None;
        }

        let mut exponent = 0i32;
        if i < len && (buf[i] == b'e' || buf[i] == b'E') {
            let mut j = i + 1;
            let mut exp_negative = false;
            if j < len && (buf[j] == b'-' || buf[j] == b'+') {
                exp_negative = buf[j] == b'-';
                j += 1;
            }
            // a marker without digits is not part of the number
            if j < len && is_digit(buf[j]) {
                while j < len && is_digit(buf[j]) {
                    if exponent < EXPLICIT_EXP10_LIMIT {
                        exponent = exponent * 10 + (buf[j] - b'0') as i32;
                    }
                    j += 1;
                }
                exponent = exponent.min(EXPLICIT_EXP10_LIMIT);
                if exp_negative {
                    exponent = -exponent;
                }
                i = j;
            }
        }

        let mut integer = &buf[int_start..int_end];
        while let [b'0', rest @ ..] = integer {
            integer = rest;
        }
        let mut fraction = &buf[frac_start..frac_end];
        while let [rest @ .., b'0'] = fraction {
            fraction = rest;
        }

        Some(DecimalParts {
            negative,
            integer,
            fraction,
            exponent,
            consumed: i,
        })
    }

    /// Decimal scale applied to the digit string `integer ++ fraction`.
    #[inline]
    fn scale_exp10(&self) -> i32 {
        self.exponent - self.fraction.len() as i32
    }

    /// Fraction digits that follow the first non-zero digit of the number.
    #[inline]
    fn significant_fraction(&self) -> &'a [u8] {
        if self.integer.is_empty() {
            let zeros = self.fraction.iter().take_while(|&&b| b == b'0').count();
            &self.fraction[zeros..]
        } else {
            self.fraction
        }
    }

    /// Significant digits in the accumulator pair, `None` past 18 digits.
    fn accumulate(&self) -> Option<(u32, u32)> {
        let significant = self.significant_fraction();
        if self.integer.len() + significant.len() > ACCUMULATOR_DIGITS {
            return None;
        }

        let mut frac_hi = 0u32;
        let mut frac_lo = 0u32;
        let mut count = 0usize;
        for &b in self.integer.iter().chain(significant) {
            // once lo is full, its leading digit moves into hi
            if count >= 9 {
                frac_hi = frac_hi * 10 + frac_lo / 100_000_000;
                frac_lo %= 100_000_000;
            }
            frac_lo = frac_lo * 10 + (b - b'0') as u32;
            count += 1;
        }
        Some((frac_hi, frac_lo))
    }

    /// Unsigned magnitude; `ParseOverflow` when it exceeds `f64::MAX`.
    fn magnitude(&self) -> Result<f64> {
        if self.integer.is_empty() && self.fraction.is_empty() {
            return Ok(0.0);
        }

        let exp10 = self.scale_exp10();
        if let Some((frac_hi, frac_lo)) = self.accumulate() {
            let mantissa = frac_hi as u64 * 1_000_000_000 + frac_lo as u64;
            if mantissa <= EXACT_INTEGER_MAX && exp10.abs() <= EXACT_EXP10_MAX {
                return DecomposedFloat::to_double(frac_hi, frac_lo, exp10);
            }
        }

        let value: f64 = if self.integer.is_empty() {
            // pure fraction: hand over its significant digits as an integer
            minimal_lexical::parse_float(
                self.significant_fraction().iter(),
                b"".iter(),
                exp10,
            )
        } else {
            minimal_lexical::parse_float(
                self.integer.iter(),
                self.fraction.iter(),
                self.exponent,
            )
        };
        if value.is_infinite() {
            record_parse_overflow(exp10);
            return Err(FloatError::ParseOverflow { exp10 });
        }
        Ok(value)
    }
}

/// Parse a double from the start of `text`, returns `(value, consumed)`.
///
/// Magnitudes beyond `f64::MAX` come back as a signed infinity, magnitudes
/// below the smallest subnormal as a signed zero.
///
/// # Example
/// ```
/// # use f64_forge_helpers::parse_double;
/// assert_eq!(parse_double("123.123"), (123.123, 7));
/// assert_eq!(parse_double("  -1.5e3 apples"), (-1500.0, 8));
/// assert_eq!(parse_double("2e"), (2.0, 1));
/// assert_eq!(parse_double("."), (0.0, 0));
/// ```
#[inline]
pub fn parse_double(text: &str) -> (f64, usize) {
    parse_double_bytes(text.as_bytes())
}

/// [`parse_double`] over raw bytes.
pub fn parse_double_bytes(buf: &[u8]) -> (f64, usize) {
    let Some(parts) = DecimalParts::scan(buf) else {
        return (0.0, 0);
    };
    let magnitude = parts.magnitude().unwrap_or(f64::INFINITY);
    let value = if parts.negative { -magnitude } else { magnitude };
    (value, parts.consumed)
}

/// [`parse_double`] that reports overflow instead of returning infinity.
///
/// # Example
/// ```
/// # use f64_forge_helpers::{try_parse_double, FloatError};
/// assert_eq!(try_parse_double("0.25"), Ok((0.25, 4)));
/// assert_eq!(
///     try_parse_double("-1e400"),
///     Err(FloatError::ParseOverflow { exp10: 400 })
/// );
/// ```
pub fn try_parse_double(text: &str) -> Result<(f64, usize)> {
    let Some(parts) = DecimalParts::scan(text.as_bytes()) else {
        return Ok((0.0, 0));
    };
    let magnitude = parts.magnitude()?;
    let value = if parts.negative { -magnitude } else { magnitude };
    Ok((value, parts.consumed))
}

/// Parse a double from bytes, ignoring anything after the number.
///
/// # Example
/// ```
/// # use f64_forge_helpers::read_f64;
/// assert_eq!(read_f64(b"3.25"), 3.25);
/// assert_eq!(read_f64(b"-0.5|"), -0.5);
/// assert_eq!(read_f64(b""), 0.0);
/// ```
#[inline(always)]
pub fn read_f64(buf: &[u8]) -> f64 {
    parse_double_bytes(buf).0
}
