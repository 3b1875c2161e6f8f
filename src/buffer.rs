//! Digit buffer management for float formatting.
//!
//! The digit generator and the renderers all work on a [`DigitBuffer`]: an
//! owned, growable ASCII byte builder with the handful of operations the
//! codec needs (append, insert, truncate, bump the last digit). Digits are
//! stored most-significant first, without sign or decimal point; the
//! renderers reuse the same type for the final text.
//!
//! [`mant_round`] and [`mant_adjust`] shrink or widen a digit string and
//! report the decimal exponent shift the caller must apply.

use core::fmt;

/// Capacity reserved up front for a digit buffer.
///
/// Derived from the largest fixed-notation rendering of a double: 309
/// integer digits for `f64::MAX` plus room for a sign, a point and
/// fractional padding. Also the upper bound on requested precision.
pub const LEN_MAX_DIGITS: usize = 349;

/// Growable buffer of ASCII digits (and, once rendered, `-`, `+`, `.`, `e`, `E`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigitBuffer {
    bytes: Vec<u8>,
}

impl DigitBuffer {
    /// Create an empty buffer with [`LEN_MAX_DIGITS`] capacity.
    #[inline]
    pub fn new() -> Self {
        DigitBuffer {
            bytes: Vec::with_capacity(LEN_MAX_DIGITS),
        }
    }

    /// Build a buffer from a string of ASCII decimal digits.
    ///
    /// Returns `None` if `digits` contains anything other than `0-9`.
    ///
    /// # Example
    /// ```
    /// # use f64_forge_helpers::DigitBuffer;
    /// assert_eq!(DigitBuffer::from_digits("1203").unwrap().as_str(), "1203");
    /// assert!(DigitBuffer::from_digits("12.3").is_none());
    /// ```
    pub fn from_digits(digits: &str) -> Option<Self> {
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let mut buffer = DigitBuffer::new();
        buffer.extend_from_slice(digits.as_bytes());
        Some(buffer)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        // SAFETY: every mutator below only ever stores ASCII bytes
        unsafe { core::str::from_utf8_unchecked(&self.bytes) }
    }

    /// Empty the buffer, keeping its allocation.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    #[inline]
    pub fn into_string(self) -> String {
        // SAFETY: ASCII only, see `as_str`
        unsafe { String::from_utf8_unchecked(self.bytes) }
    }

    #[inline(always)]
    pub(crate) fn push(&mut self, b: u8) {
        debug_assert!(b.is_ascii());
        self.bytes.push(b);
    }

    #[inline(always)]
    pub(crate) fn push_digit(&mut self, d: u8) {
        debug_assert!(d < 10);
        self.bytes.push(b'0' + d);
    }

    #[inline]
    pub(crate) fn push_zeros(&mut self, count: usize) {
        self.bytes.resize(self.bytes.len() + count, b'0');
    }

    #[inline]
    pub(crate) fn extend_from_slice(&mut self, ascii: &[u8]) {
        debug_assert!(ascii.is_ascii());
        self.bytes.extend_from_slice(ascii);
    }

    #[inline]
    pub(crate) fn insert(&mut self, index: usize, b: u8) {
        debug_assert!(b.is_ascii());
        self.bytes.insert(index, b);
    }

    #[inline(always)]
    pub(crate) fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    /// Lower the last digit by one. Never borrows from the digit before it.
    #[inline(always)]
    pub(crate) fn decrement_last(&mut self) {
        if let Some(last) = self.bytes.last_mut() {
            debug_assert!(*last > b'0');
            *last -= 1;
        }
    }

    /// Add one unit in the last place, carrying leftwards through nines.
    ///
    /// Returns `true` if the carry ran off the front; the digits are then
    /// all zero.
    fn increment(&mut self) -> bool {
        for digit in self.bytes.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                return false;
            }
        }
        true
    }

    /// Drop trailing zeros (keeping at least one digit) and return how many
    /// were removed.
    pub(crate) fn trim_trailing_zeros(&mut self) -> i32 {
        let keep = self
            .bytes
            .iter()
            .rposition(|&b| b != b'0')
            .map_or(1, |i| i + 1);
        let removed = self.bytes.len().saturating_sub(keep);
        self.bytes.truncate(keep);
        removed as i32
    }
}

impl AsRef<[u8]> for DigitBuffer {
    #[inline(always)]
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for DigitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round `digits` to `new_len` significant digits.
///
/// Only the digit right after the cut decides: it rounds up when it is
/// strictly greater than `'5'`. A following `'5'` truncates, whatever comes
/// after it. A carry out of the leading digit leaves `"1"` followed by zeros
/// and never grows the buffer: `"9999"` cut to 3 becomes `"100"` with the
/// extra power of ten folded into the returned shift, not `"1000"`.
///
/// Returns the decimal exponent shift: `digits * 10^exp10` before the call
/// equals (after rounding) `digits * 10^(exp10 + shift)` after it. Rounding
/// everything away without a carry leaves the single digit `"0"`.
///
/// # Example
/// ```
/// # use f64_forge_helpers::{DigitBuffer, mant_round};
/// let mut digits = DigitBuffer::from_digits("9999").unwrap();
/// assert_eq!(mant_round(&mut digits, 3), 2);
/// assert_eq!(digits.as_str(), "100");
///
/// let mut digits = DigitBuffer::from_digits("1250").unwrap();
/// assert_eq!(mant_round(&mut digits, 2), 2);
/// assert_eq!(digits.as_str(), "12");
/// ```
pub fn mant_round(digits: &mut DigitBuffer, new_len: usize) -> i32 {
    let old_len = digits.len();
    if new_len >= old_len {
        return 0;
    }

    let round_up = digits.as_bytes()[new_len] > b'5';
    digits.truncate(new_len);
    let mut shift = (old_len - new_len) as i32;

    if round_up && digits.increment() {
        if new_len == 0 {
            digits.push(b'1');
        } else {
            digits.bytes[0] = b'1';
            shift += 1;
        }
    }
    if digits.is_empty() {
        digits.push(b'0');
    }
    shift
}

/// Bring `digits` to exactly `new_len` digits, rounding with [`mant_round`]
/// or padding with zeros on the right.
///
/// Returns the signed decimal exponent shift (negative after padding).
///
/// # Example
/// ```
/// # use f64_forge_helpers::{DigitBuffer, mant_adjust};
/// let mut digits = DigitBuffer::from_digits("12").unwrap();
/// assert_eq!(mant_adjust(&mut digits, 4), -2);
/// assert_eq!(digits.as_str(), "1200");
/// ```
pub fn mant_adjust(digits: &mut DigitBuffer, new_len: usize) -> i32 {
    let len = digits.len();
    if new_len < len {
        mant_round(digits, new_len)
    } else {
        let pad = new_len - len;
        digits.push_zeros(pad);
        -(pad as i32)
    }
}
