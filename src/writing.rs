//! Float-to-text rendering in fixed, scientific and general styles.
//!
//! Every style starts from the same Grisu2 decomposition (`digits`, `exp10`)
//! and only decides where the decimal point goes and how many digits are
//! kept. Without an explicit precision the output is the shortest text that
//! parses back to the identical double.
//!
//! # Design Philosophy
//!
//! - **Round-trip first**: natural precision never loses information
//! - **printf-shaped**: `f`, `e` and `g` conversions, 2-3 digit exponents
//! - **Typed failure**: NaN and infinities are rejected, never rendered
//! - **Literal rounding**: precision cuts round up only on a following digit
//!   greater than `5` (see [`crate::mant_round`])
//!
//! # Capacity Requirements
//!
//! - General / scientific: at most 25 bytes (sign, 17 digits, point, `e-324`)
//! - Fixed: up to 327 bytes at natural precision, plus requested padding

use crate::DIGIT_PAIRS;
use crate::buffer::{DigitBuffer, LEN_MAX_DIGITS, mant_adjust, mant_round};
use crate::errors::{FloatError, Result};
use crate::grisu::grisu2_into;

/// Lowest decimal-point position General renders in fixed notation.
const GENERAL_FIXED_MIN: i32 = -5;

/// Highest decimal-point position General renders in fixed notation.
const GENERAL_FIXED_MAX: i32 = 21;

/// Destination the renderers append bytes to.
trait ByteSink {
    fn push(&mut self, b: u8);
    fn extend_from_slice(&mut self, bytes: &[u8]);
    fn push_zeros(&mut self, count: usize);

    #[inline(always)]
    fn push_digit(&mut self, d: u8) {
        debug_assert!(d < 10);
        self.push(b'0' + d);
    }
}

impl ByteSink for DigitBuffer {
    #[inline(always)]
    fn push(&mut self, b: u8) {
        DigitBuffer::push(self, b);
    }

    #[inline(always)]
    fn extend_from_slice(&mut self, bytes: &[u8]) {
        DigitBuffer::extend_from_slice(self, bytes);
    }

    #[inline(always)]
    fn push_zeros(&mut self, count: usize) {
        DigitBuffer::push_zeros(self, count);
    }
}

/// Writes straight into a caller buffer starting at `pos`.
///
/// Bytes that do not fit are dropped but still counted, so `pos` ends up at
/// the position the full rendering would have reached.
struct SliceSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl SliceSink<'_> {
    #[inline(always)]
    fn overflowed(&self) -> bool {
        self.pos > self.buf.len()
    }
}

impl ByteSink for SliceSink<'_> {
    #[inline(always)]
    fn push(&mut self, b: u8) {
        if let Some(slot) = self.buf.get_mut(self.pos) {
            *slot = b;
        }
        self.pos += 1;
    }

    #[inline(always)]
    fn extend_from_slice(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        if let Some(dst) = self.buf.get_mut(self.pos..end) {
            dst.copy_from_slice(bytes);
        }
        self.pos = end;
    }

    #[inline(always)]
    fn push_zeros(&mut self, count: usize) {
        let end = self.pos + count;
        if let Some(dst) = self.buf.get_mut(self.pos..end) {
            dst.fill(b'0');
        }
        self.pos = end;
    }
}

/// Output notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatStyle {
    /// `%f`: plain decimal, precision counts digits after the point
    Fixed,
    /// `%e`: one leading digit, precision counts digits after the point
    Scientific,
    /// `%g`: fixed or scientific depending on magnitude, precision counts
    /// significant digits
    #[default]
    General,
}

impl FloatStyle {
    /// Map a printf conversion character to a style, ignoring case.
    ///
    /// # Example
    /// ```
    /// # use f64_forge_helpers::FloatStyle;
    /// assert_eq!(FloatStyle::from_conversion(b'e'), Some(FloatStyle::Scientific));
    /// assert_eq!(FloatStyle::from_conversion(b'G'), Some(FloatStyle::General));
    /// assert_eq!(FloatStyle::from_conversion(b'x'), None);
    /// ```
    pub const fn from_conversion(conversion: u8) -> Option<FloatStyle> {
        match conversion {
            b'f' | b'F' => Some(FloatStyle::Fixed),
            b'e' | b'E' => Some(FloatStyle::Scientific),
            b'g' | b'G' => Some(FloatStyle::General),
            _ => None,
        }
    }
}

/// Formatting configuration: style, optional precision and exponent case.
///
/// Precision is clamped to [`LEN_MAX_DIGITS`]. For [`FloatStyle::General`] a
/// precision of zero is treated as one.
///
/// # Example
/// ```
/// # use f64_forge_helpers::{FloatStyle, FormatOptions};
/// let options = FormatOptions::new(FloatStyle::Scientific)
///     .with_precision(2)
///     .with_uppercase(true);
/// assert_eq!(options.format(1234.0).unwrap(), "1.23E+03");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    pub style: FloatStyle,
    pub precision: Option<u32>,
    pub uppercase: bool,
}

impl FormatOptions {
    #[inline]
    pub const fn new(style: FloatStyle) -> Self {
        FormatOptions {
            style,
            precision: None,
            uppercase: false,
        }
    }

    #[inline]
    pub const fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    #[inline]
    pub const fn with_uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    /// Options for a printf conversion character; `E` and `G` select an
    /// uppercase exponent marker.
    pub const fn from_conversion(conversion: u8) -> Option<Self> {
        match FloatStyle::from_conversion(conversion) {
            Some(style) => Some(FormatOptions {
                style,
                precision: None,
                uppercase: conversion.is_ascii_uppercase(),
            }),
            None => None,
        }
    }

    #[inline]
    fn clamped_precision(&self) -> Option<usize> {
        self.precision
            .map(|p| (p as usize).min(LEN_MAX_DIGITS))
    }

    #[inline]
    fn exponent_marker(&self) -> u8 {
        if self.uppercase { b'E' } else { b'e' }
    }

    /// Render `value` into a new string.
    pub fn format(&self, value: f64) -> Result<String> {
        let mut out = DigitBuffer::new();
        self.format_into(value, &mut out)?;
        Ok(out.into_string())
    }

    /// Append the rendering of `value` to `out`.
    ///
    /// Fails with [`FloatError::NonFinite`] for NaN and infinities, leaving
    /// `out` untouched.
    pub fn format_into(&self, value: f64, out: &mut DigitBuffer) -> Result<()> {
        self.render(value, out)
    }

    /// Write the rendering of `value` into `buf` at `offset`, returns bytes
    /// written.
    ///
    /// Renders in place without an intermediate string. On
    /// [`FloatError::BufferTooSmall`] the bytes after `offset` are
    /// unspecified.
    ///
    /// # Example
    /// ```
    /// # use f64_forge_helpers::{FloatStyle, FormatOptions};
    /// let mut buf = [0u8; 16];
    /// let options = FormatOptions::new(FloatStyle::Fixed).with_precision(3);
    /// let written = options.write(&mut buf, 2, 2.5).unwrap();
    /// assert_eq!(&buf[2..2 + written], b"2.500");
    /// ```
    pub fn write(&self, buf: &mut [u8], offset: usize, value: f64) -> Result<usize> {
        let available = buf.len().saturating_sub(offset);
        let mut sink = SliceSink { buf, pos: offset };
        self.render(value, &mut sink)?;

        let needed = sink.pos - offset;
        if sink.overflowed() {
            return Err(FloatError::BufferTooSmall { needed, available });
        }
        Ok(needed)
    }

    fn render<S: ByteSink>(&self, value: f64, out: &mut S) -> Result<()> {
        if !value.is_finite() {
            return Err(FloatError::NonFinite { value });
        }
        if value.is_sign_negative() {
            out.push(b'-');
        }

        let mut digits = DigitBuffer::new();
        let exp10 = grisu2_into(value.abs(), &mut digits);
        let precision = self.clamped_precision();

        match self.style {
            FloatStyle::Fixed => {
                let places = precision.map_or(-1, |p| p as i32);
                render_fixed(out, &mut digits, exp10, places);
            }
            FloatStyle::Scientific => {
                render_scientific(out, &mut digits, exp10, precision, self.exponent_marker());
            }
            FloatStyle::General => {
                render_general(out, &mut digits, exp10, precision, self.exponent_marker());
            }
        }
        Ok(())
    }
}

/// Format a finite double.
///
/// `precision` is the number of digits after the point for
/// [`FloatStyle::Fixed`] and [`FloatStyle::Scientific`], and the number of
/// significant digits for [`FloatStyle::General`]. `None` means the shortest
/// round-trip digits.
///
/// # Example
/// ```
/// # use f64_forge_helpers::{format_double, FloatStyle};
/// assert_eq!(format_double(123.123, None, FloatStyle::General).unwrap(), "123.123");
/// assert_eq!(format_double(1234.0, Some(3), FloatStyle::Scientific).unwrap(), "1.234e+03");
/// assert_eq!(format_double(2.0 / 3.0, Some(2), FloatStyle::Fixed).unwrap(), "0.67");
/// assert!(format_double(f64::NAN, None, FloatStyle::General).is_err());
/// ```
pub fn format_double(value: f64, precision: Option<u32>, style: FloatStyle) -> Result<String> {
    FormatOptions {
        style,
        precision,
        uppercase: false,
    }
    .format(value)
}

/// Write a double in general style with round-trip precision, returns bytes
/// written.
///
/// # Example
/// ```
/// # use f64_forge_helpers::write_f64;
/// let mut buf = [0u8; 32];
/// let written = write_f64(&mut buf, 0, -0.000125).unwrap();
/// assert_eq!(&buf[..written], b"-0.000125");
/// ```
#[inline]
pub fn write_f64(buf: &mut [u8], offset: usize, value: f64) -> Result<usize> {
    FormatOptions::default().write(buf, offset, value)
}

/// `%g`: round to `precision` significant digits, then pick fixed notation
/// while the decimal point lands within `-5..=21`, scientific otherwise.
fn render_general<S: ByteSink>(
    out: &mut S,
    digits: &mut DigitBuffer,
    mut exp10: i32,
    precision: Option<usize>,
    marker: u8,
) {
    if let Some(precision) = precision {
        let precision = precision.max(1);
        if precision < digits.len() {
            exp10 += mant_round(digits, precision);
        }
    }
    exp10 += digits.trim_trailing_zeros();

    let decimal_place = digits.len() as i32 + exp10;
    if (GENERAL_FIXED_MIN..=GENERAL_FIXED_MAX).contains(&decimal_place) {
        let places = if exp10 >= 0 { 0 } else { -1 };
        render_fixed(out, digits, exp10, places);
    } else {
        render_scientific(out, digits, exp10, None, marker);
    }
}

/// `%e`: `d.ddd` followed by the exponent. With a precision the digits are
/// padded or rounded to exactly `precision + 1`.
fn render_scientific<S: ByteSink>(
    out: &mut S,
    digits: &mut DigitBuffer,
    mut exp10: i32,
    precision: Option<usize>,
    marker: u8,
) {
    if let Some(precision) = precision {
        exp10 += mant_adjust(digits, precision + 1);
    }

    let len = digits.len() as i32;
    if len > 1 {
        digits.insert(1, b'.');
    }
    out.extend_from_slice(digits.as_bytes());
    write_exponent(out, len + exp10 - 1, marker);
}

/// `%f`: place the decimal point, then pad or round so that exactly `places`
/// digits follow it. A negative `places` keeps the natural digits.
fn render_fixed<S: ByteSink>(out: &mut S, digits: &mut DigitBuffer, mut exp10: i32, places: i32) {
    if places >= 0 && exp10 < -places {
        let new_len = digits.len() as i32 + exp10 + places;
        if new_len < 0 {
            // everything is below the last kept place
            digits.clear();
            digits.push(b'0');
            exp10 = -places;
        } else {
            exp10 += mant_round(digits, new_len as usize);
        }
    }

    let decimal_place = digits.len() as i32 + exp10;
    let frac_digits = if exp10 >= 0 {
        out.extend_from_slice(digits.as_bytes());
        out.push_zeros(exp10 as usize);
        if places > 0 {
            out.push(b'.');
        }
        0
    } else if decimal_place > 0 {
        let (int_part, frac_part) = digits.as_bytes().split_at(decimal_place as usize);
        out.extend_from_slice(int_part);
        out.push(b'.');
        out.extend_from_slice(frac_part);
        -exp10
    } else {
        out.extend_from_slice(b"0.");
        out.push_zeros((-decimal_place) as usize);
        out.extend_from_slice(digits.as_bytes());
        -exp10
    };

    if places > frac_digits {
        out.push_zeros((places - frac_digits) as usize);
    }
}

/// Exponent suffix: marker, sign, then two digits (three from 100 up).
#[inline(always)]
fn write_exponent<S: ByteSink>(out: &mut S, exponent: i32, marker: u8) {
    out.push(marker);
    out.push(if exponent < 0 { b'-' } else { b'+' });

    let mut magnitude = exponent.unsigned_abs() as usize;
    debug_assert!(magnitude < 1000);
    if magnitude >= 100 {
        out.push_digit((magnitude / 100) as u8);
        magnitude %= 100;
    }
    out.extend_from_slice(&DIGIT_PAIRS[magnitude * 2..magnitude * 2 + 2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn general(value: f64) -> String {
        format_double(value, None, FloatStyle::General).unwrap()
    }

    fn general_p(value: f64, precision: u32) -> String {
        format_double(value, Some(precision), FloatStyle::General).unwrap()
    }

    fn scientific(value: f64, precision: Option<u32>) -> String {
        format_double(value, precision, FloatStyle::Scientific).unwrap()
    }

    fn fixed(value: f64, precision: Option<u32>) -> String {
        format_double(value, precision, FloatStyle::Fixed).unwrap()
    }

    #[test]
    fn test_general_shortest() {
        assert_eq!(general(123.123), "123.123");
        assert_eq!(general(1.0), "1");
        assert_eq!(general(100.0), "100");
        assert_eq!(general(0.1), "0.1");
        assert_eq!(general(-1.5), "-1.5");
        assert_eq!(general(2.0 / 3.0), "0.6666666666666666");
    }

    #[test]
    fn test_general_zero_and_sign() {
        assert_eq!(general(0.0), "0");
        assert_eq!(general(-0.0), "-0");
    }

    #[test]
    fn test_general_fixed_window() {
        assert_eq!(general(1e20), "100000000000000000000");
        assert_eq!(general(1.2345678901234568e20), "123456789012345680000");
        assert_eq!(general(1e21), "1e+21");
        assert_eq!(general(0.000001), "0.000001");
        assert_eq!(general(1e-5), "0.00001");
        assert_eq!(general(1e-7), "1e-07");
    }

    #[test]
    fn test_general_extremes() {
        assert_eq!(general(5e-324), "5e-324");
        assert_eq!(general(f64::MIN_POSITIVE), "2.2250738585072014e-308");
        assert_eq!(general(f64::MAX), "1.7976931348623157e+308");
        assert_eq!(general(-f64::MAX), "-1.7976931348623157e+308");
        assert_eq!(general(1e100), "1e+100");
        assert_eq!(general(1e23), "9.999999999999999e+22");
    }

    #[test]
    fn test_general_with_precision() {
        assert_eq!(general_p(1234.5678, 6), "1234.57");
        assert_eq!(general_p(2.0 / 3.0, 3), "0.667");
        assert_eq!(general_p(0.000123456, 2), "0.00012");
        assert_eq!(general_p(1234.0, 3), "1230");
        assert_eq!(general_p(f64::MIN_POSITIVE, 3), "2.22e-308");
        assert_eq!(general_p(f64::MAX, 3), "1.8e+308");
        // zero precision behaves as one significant digit
        assert_eq!(general_p(1234.0, 0), "1000");
        assert_eq!(general_p(0.1, 0), "0.1");
    }

    #[test]
    fn test_general_carry_cascade() {
        assert_eq!(general_p(99.99, 3), "100");
        assert_eq!(general_p(9.9999, 3), "10");
        assert_eq!(general_p(99.99, 4), "99.99");
    }

    #[test]
    fn test_scientific() {
        assert_eq!(scientific(1234.0, Some(3)), "1.234e+03");
        assert_eq!(scientific(123456.0, None), "1.23456e+05");
        assert_eq!(scientific(120.0, None), "1.2e+02");
        assert_eq!(scientific(1e-10, None), "1e-10");
        assert_eq!(scientific(0.1, Some(0)), "1e-01");
        assert_eq!(scientific(2.0 / 3.0, Some(3)), "6.667e-01");
        assert_eq!(scientific(99.99, Some(3)), "9.999e+01");
    }

    #[test]
    fn test_scientific_padding_and_rounding() {
        assert_eq!(scientific(0.0, Some(3)), "0.000e+00");
        assert_eq!(scientific(-0.0, Some(3)), "-0.000e+00");
        assert_eq!(scientific(1.0, Some(3)), "1.000e+00");
        assert_eq!(scientific(1.25, Some(1)), "1.2e+00");
        assert_eq!(scientific(9.96, Some(1)), "1.0e+01");
    }

    #[test]
    fn test_scientific_three_digit_exponents() {
        assert_eq!(scientific(1e300, Some(2)), "1.00e+300");
        assert_eq!(scientific(f64::MAX, Some(3)), "1.798e+308");
        assert_eq!(scientific(5e-324, Some(3)), "5.000e-324");
        assert_eq!(scientific(1e100, Some(3)), "1.000e+100");
    }

    #[test]
    fn test_uppercase_marker() {
        let options = FormatOptions::new(FloatStyle::General).with_uppercase(true);
        assert_eq!(options.format(1e-7).unwrap(), "1E-07");
        assert_eq!(options.format(12.5).unwrap(), "12.5");
    }

    #[test]
    fn test_fixed_natural() {
        assert_eq!(fixed(0.5, None), "0.5");
        assert_eq!(fixed(123.123, None), "123.123");
        assert_eq!(fixed(1e21, None), "1000000000000000000000");

        let tiny = fixed(5e-324, None);
        assert_eq!(tiny.len(), 326);
        assert!(tiny.starts_with("0.000"));
        assert!(tiny.ends_with("05"));

        let huge = fixed(f64::MAX, None);
        assert_eq!(huge.len(), 309);
        assert!(huge.starts_with("17976931348623157"));
    }

    #[test]
    fn test_fixed_with_places() {
        assert_eq!(fixed(123.123, Some(2)), "123.12");
        assert_eq!(fixed(0.0, Some(2)), "0.00");
        assert_eq!(fixed(1.0, Some(2)), "1.00");
        assert_eq!(fixed(99.99, Some(2)), "99.99");
        assert_eq!(fixed(2.0 / 3.0, Some(2)), "0.67");
        assert_eq!(fixed(-1.5, Some(2)), "-1.50");
        assert_eq!(fixed(3.14159, Some(2)), "3.14");
        assert_eq!(fixed(123.0, Some(0)), "123");
    }

    #[test]
    fn test_fixed_rounding_below_precision() {
        assert_eq!(fixed(1e-7, Some(2)), "0.00");
        assert_eq!(fixed(0.0004, Some(3)), "0.000");
        assert_eq!(fixed(0.0006, Some(3)), "0.001");
        assert_eq!(fixed(0.96, Some(1)), "1.0");
        assert_eq!(fixed(9.96, Some(1)), "10.0");
    }

    #[test]
    fn test_fixed_five_does_not_round_up() {
        assert_eq!(fixed(0.0005, Some(3)), "0.000");
        assert_eq!(fixed(1.5, Some(0)), "1");
        assert_eq!(fixed(2.5, Some(0)), "2");
        assert_eq!(fixed(2.6, Some(0)), "3");
    }

    #[test]
    fn test_precision_is_clamped() {
        let text = fixed(1.0, Some(u32::MAX));
        assert_eq!(text.len(), 2 + LEN_MAX_DIGITS);
        assert!(text.starts_with("1.000"));
    }

    #[test]
    fn test_non_finite_rejected() {
        for &value in &[f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            for style in [FloatStyle::Fixed, FloatStyle::Scientific, FloatStyle::General] {
                let error = format_double(value, None, style).unwrap_err();
                assert!(matches!(error, FloatError::NonFinite { .. }));
            }
        }

        let mut out = DigitBuffer::new();
        assert!(
            FormatOptions::default()
                .format_into(f64::NEG_INFINITY, &mut out)
                .is_err()
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_from_conversion() {
        let options = FormatOptions::from_conversion(b'E').unwrap();
        assert_eq!(options.style, FloatStyle::Scientific);
        assert!(options.uppercase);

        let options = FormatOptions::from_conversion(b'f').unwrap();
        assert_eq!(options.style, FloatStyle::Fixed);
        assert!(!options.uppercase);

        assert!(FormatOptions::from_conversion(b'd').is_none());
        assert_eq!(FormatOptions::default().style, FloatStyle::General);
    }

    #[test]
    fn test_write_f64() {
        let mut buf = [0u8; 32];
        let written = write_f64(&mut buf, 0, 123.123).unwrap();
        assert_eq!(&buf[..written], b"123.123");

        let written = write_f64(&mut buf, 10, -2.5e-10).unwrap();
        assert_eq!(&buf[10..10 + written], b"-2.5e-10");
        // bytes before the offset are untouched
        assert_eq!(&buf[..7], b"123.123");
    }

    #[test]
    fn test_write_buffer_too_small() {
        let mut buf = [0u8; 8];
        assert_eq!(
            write_f64(&mut buf, 0, f64::MAX),
            Err(FloatError::BufferTooSmall {
                needed: 23,
                available: 8
            })
        );
        assert_eq!(
            write_f64(&mut buf, 20, 1.0),
            Err(FloatError::BufferTooSmall {
                needed: 1,
                available: 0
            })
        );
        assert_eq!(write_f64(&mut buf, 7, 1.0), Ok(1));
    }

    #[test]
    fn test_write_renders_in_place() {
        let options = FormatOptions::new(FloatStyle::Fixed).with_precision(u32::MAX);
        let needed = 2 + LEN_MAX_DIGITS;

        let mut exact = vec![b'#'; needed + 3];
        assert_eq!(options.write(&mut exact, 3, 1.0), Ok(needed));
        assert_eq!(&exact[..3], b"###");
        assert_eq!(&exact[3..5], b"1.");
        assert!(exact[5..].iter().all(|&b| b == b'0'));

        let mut short = vec![0u8; needed + 2];
        assert_eq!(
            options.write(&mut short, 3, 1.0),
            Err(FloatError::BufferTooSmall {
                needed,
                available: needed - 1
            })
        );
    }

    #[test]
    fn test_slice_sink_counts_dropped_bytes() {
        let mut buf = [0u8; 4];
        let mut sink = SliceSink {
            buf: &mut buf,
            pos: 1,
        };
        sink.push(b'-');
        sink.extend_from_slice(b"12");
        assert!(!sink.overflowed());
        sink.push_zeros(3);
        sink.push_digit(7);
        assert_eq!(sink.pos, 8);
        assert!(sink.overflowed());
        assert_eq!(&buf, b"\0-12");
    }

    #[test]
    fn test_write_exponent() {
        let mut out = DigitBuffer::new();
        write_exponent(&mut out, 5, b'e');
        write_exponent(&mut out, -42, b'E');
        write_exponent(&mut out, 308, b'e');
        write_exponent(&mut out, -324, b'e');
        assert_eq!(out.as_str(), "e+05E-42e+308e-324");
    }
}
