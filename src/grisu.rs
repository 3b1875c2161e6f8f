//! Grisu2 shortest round-trip digit generation.
//!
//! Produces the decimal digits of a double (no sign, no point) and a base-10
//! exponent such that `digits * 10^exp10` reads back as the same double.
//! Grisu2 always round-trips but is not always the shortest such string: for
//! a small fraction of inputs it emits one digit more than needed (`1e23`
//! comes out as `9999999999999999 * 10^7`).
//!
//! All arithmetic is on 64-bit integers; the only tables consulted are the
//! cached powers of ten and the u64 powers of ten.

use crate::buffer::DigitBuffer;
use crate::diyfp::{DecomposedFloat, get_cached_power};
use crate::powers::POW10_U64;

/// Calculate the decimal digit length of a u32 (1 for zero)
#[inline(always)]
pub fn count_decimal_digits(n: u32) -> u32 {
    if n >= 1_000_000_000 {
        10
    } else if n >= 100_000_000 {
        9
    } else if n >= 10_000_000 {
        8
    } else if n >= 1_000_000 {
        7
    } else if n >= 100_000 {
        6
    } else if n >= 10_000 {
        5
    } else if n >= 1_000 {
        4
    } else if n >= 100 {
        3
    } else if n >= 10 {
        2
    } else {
        1
    }
}

/// Shortest-digits decomposition of `|value|`.
///
/// `value` must be finite; its sign is ignored. Zero yields `("0", 0)`.
///
/// # Example
/// ```
/// # use f64_forge_helpers::grisu2;
/// assert_eq!(grisu2(123.123), ("123123".to_string(), -3));
/// assert_eq!(grisu2(1e21), ("1".to_string(), 21));
/// assert_eq!(grisu2(0.0), ("0".to_string(), 0));
/// ```
pub fn grisu2(value: f64) -> (String, i32) {
    let mut digits = DigitBuffer::new();
    let exp10 = grisu2_into(value, &mut digits);
    (digits.into_string(), exp10)
}

/// [`grisu2`] writing into a reusable buffer. The buffer is cleared first;
/// the decimal exponent is returned.
pub fn grisu2_into(value: f64, digits: &mut DigitBuffer) -> i32 {
    debug_assert!(value.is_finite());
    digits.clear();
    if value == 0.0 {
        digits.push(b'0');
        return 0;
    }

    let v = DecomposedFloat::from_double(value);
    let (w_minus, w_plus) = v.normalized_boundaries();

    let (cached, exp10) = get_cached_power(w_plus.exp2);
    let c_mk = cached.as_decomposed();

    let w = v.normalize() * c_mk;
    let mut wp = w_plus * c_mk;
    let mut wm = w_minus * c_mk;
    // stay inside the interval despite the rounded multiplications
    wm.mantissa += 1;
    wp.mantissa -= 1;

    digit_gen(w, wp, wp.mantissa - wm.mantissa, digits, exp10)
}

/// Emit digits of `wp` until the remainder falls inside the rounding interval
/// of width `delta`, then correct the last digit towards `w`.
fn digit_gen(
    w: DecomposedFloat,
    wp: DecomposedFloat,
    mut delta: u64,
    digits: &mut DigitBuffer,
    exp10: i32,
) -> i32 {
    let shift = (-wp.exp2) as u32;
    let one = DecomposedFloat::new(1u64 << shift, wp.exp2);
    let wp_w = wp - w;
    let mut p1 = (wp.mantissa >> shift) as u32;
    let mut p2 = wp.mantissa & (one.mantissa - 1);
    let mut kappa = count_decimal_digits(p1) as i32;

    while kappa > 0 {
        let divisor = POW10_U64[(kappa - 1) as usize] as u32;
        let d = p1 / divisor;
        p1 %= divisor;
        if d != 0 || !digits.is_empty() {
            digits.push_digit(d as u8);
        }
        kappa -= 1;
        let rest = ((p1 as u64) << shift) + p2;
        if rest <= delta {
            grisu_round(
                digits,
                delta,
                rest,
                POW10_U64[kappa as usize] << shift,
                wp_w.mantissa,
            );
            return exp10 + kappa;
        }
    }

    loop {
        p2 *= 10;
        delta *= 10;
        let d = (p2 >> shift) as u8;
        if d != 0 || !digits.is_empty() {
            digits.push_digit(d);
        }
        p2 &= one.mantissa - 1;
        kappa -= 1;
        if p2 < delta {
            // at most 17 fractional digits are ever generated
            let index = (-kappa) as usize;
            debug_assert!(index < POW10_U64.len());
            grisu_round(
                digits,
                delta,
                p2,
                one.mantissa,
                wp_w.mantissa.wrapping_mul(POW10_U64[index]),
            );
            return exp10 + kappa;
        }
    }
}

/// Walk the last digit down while the candidate below is still inside the
/// interval and closer to the exact value `wp - wp_w`.
///
/// The loop guard keeps the digit from going below `'0'`, so no borrow into
/// the previous digit is ever needed.
#[inline]
pub fn grisu_round(digits: &mut DigitBuffer, delta: u64, mut rest: u64, ten_kappa: u64, wp_w: u64) {
    while rest < wp_w
        && delta - rest >= ten_kappa
        && (rest + ten_kappa < wp_w || wp_w - rest > rest + ten_kappa - wp_w)
    {
        digits.decrement_last();
        rest += ten_kappa;
    }
}
